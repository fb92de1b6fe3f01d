// Example: a keyed repeater without a layout keeps children across reorders.
use virtual_repeater::{
    HeadlessContainer, NodeIds, Rect, Repeater, RepeaterOptions, Window,
};

fn main() {
    let ids = NodeIds::new();
    let options = RepeaterOptions::new_with_key(|item: &&str, _| item.to_string())
        .with_new_child(move |_, _| ids.next());
    let mut repeater: Repeater<&str, HeadlessContainer, String> = Repeater::new(options);
    repeater.set_container(Some(HeadlessContainer::new(
        Rect::new(0, 0, 100, 100),
        Rect::new(0, 0, 100, 100),
    )));

    repeater.set_items(vec!["a", "b", "c", "d", "e"]);
    repeater.flush();
    println!("before: {:?}", repeater.ordered().collect::<Vec<_>>());

    repeater.set_items(vec!["e", "d", "c", "b", "a"]);
    let pass = repeater.render();
    println!("after:  {:?}", repeater.ordered().collect::<Vec<_>>());
    println!("stats:  {:?}", pass.stats);

    repeater.set_window(Window::new(1, 3));
    let pass = repeater.render();
    println!("window 1..=3: {:?} {:?}", repeater.ordered().collect::<Vec<_>>(), pass.stats);
}
