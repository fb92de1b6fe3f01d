// Example: a headless vertical list that settles on measured sizes, then scrolls.
use virtual_repeater::{HeadlessContainer, NodeId, NodeIds, Rect, Size, VisibleRange};
use virtual_repeater_adapter::{FlowLayoutOptions, GridLayoutOptions, LayoutRegistry, VirtualList};

fn main() {
    let ids = NodeIds::new();
    let registry = LayoutRegistry::new(
        FlowLayoutOptions::new(|_| 48).with_overscan(2),
        GridLayoutOptions::default(),
    );
    let mut list: VirtualList<String, HeadlessContainer> = VirtualList::new().with_registry(registry);
    list.set_items((0..10_000).map(|i| format!("row {i}")).collect::<Vec<_>>());
    list.set_new_child(move |_: &String, _: usize| ids.next());
    list.set_update_child(Some(|node: &NodeId, item: &String, index: usize| {
        if index % 1_000 == 0 {
            println!("bind {node:?} -> {item}");
        }
    }));
    list.on_range_change(Some(|range: VisibleRange| {
        println!("settled on {}..={}", range.first, range.last);
    }));

    // Rows render 32px tall, against a 48px estimate.
    let container = HeadlessContainer::new(Rect::new(0, 0, 320, 480), Rect::new(0, 0, 320, 480))
        .with_child_size(Size::new(320, 32));
    list.connect(container);
    let tasks = list.flush();
    println!("initial flush ran {tasks} tasks");

    for offset in [1_000i64, 25_000, 250_000] {
        if let Some(container) = list.coordinator_mut().and_then(|c| c.container_mut()) {
            let rect = container.rect();
            container.set_rect(Rect::new(0, -offset, rect.width, rect.height));
        }
        list.handle_scroll();
        list.flush();
    }

    if let Some(coordinator) = list.coordinator() {
        println!("scroll size: {:?}", coordinator.scroll_size());
        println!(
            "live children: {}",
            coordinator.container().map_or(0, |c| c.nodes().len())
        );
    }

    list.set_layout("vertical-grid").expect("known layout");
    list.flush();
    println!(
        "grid window: {:?}",
        list.coordinator()
            .and_then(|c| c.repeater().committed_range())
    );
}
