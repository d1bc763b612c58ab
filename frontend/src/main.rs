use sortable_formset_zoon::zoon::{println, *};
use sortable_formset_zoon::{mount_all, unmount_all};

fn main() {
    start_app("app", root);
    Task::start(async {
        // Yield once so the page markup is in the document before the
        // containers are scanned.
        Timer::sleep(0).await;
        unmount_all();
        let mounted = mount_all();
        println!("[DataEntry] page ready with {mounted} formset(s)");
    });
}

fn root() -> impl Element {
    RawHtmlEl::new("div").inner_markup(include_str!("data_entry.html"))
}
