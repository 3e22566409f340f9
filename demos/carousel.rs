use loop_pager::{Container, PagerAdapter, PagerOptions, ScrollState, ViewPager};

const IMAGES: [&str; 5] = ["dawn.png", "harbor.png", "meadow.png", "ridge.png", "dusk.png"];
const AUTO_SCROLL_MS: u64 = 3_000;
const FRAME_MS: u64 = 16;

struct Images;

impl PagerAdapter for Images {
    type View = &'static str;
    type Item = usize;
    type State = ();

    fn count(&self) -> usize {
        IMAGES.len()
    }

    fn instantiate_item(&mut self, container: &mut Container<&'static str>, position: usize) -> usize {
        container.add_view(IMAGES[position]);
        position
    }

    fn destroy_item(&mut self, container: &mut Container<&'static str>, _position: usize, item: usize) {
        container.remove_view(&IMAGES[item]);
    }

    fn is_view_from_item(&self, view: &&'static str, item: &usize) -> bool {
        *view == IMAGES[*item]
    }
}

fn main() {
    let options = PagerOptions::new()
        .with_page_margin(8)
        .with_on_page_selected(Some(|index: usize| println!("selected {}", IMAGES[index])))
        .with_on_scroll_state_changed(Some(|state: ScrollState| println!("  {state:?}")));

    let mut pager = ViewPager::new(options);
    pager.attach_to_window();
    pager.set_size(320, 0, 0);
    pager.set_adapter(Images);
    pager.layout();

    let mut now = 0;
    let mut next_page = AUTO_SCROLL_MS;
    while now < 8 * AUTO_SCROLL_MS {
        if now >= next_page {
            pager.page_right();
            next_page += AUTO_SCROLL_MS;
        }
        pager.tick(now);
        if pager.needs_layout() {
            pager.layout();
        }
        now += FRAME_MS;
    }

    // A user flick to the left wraps past the first image.
    pager.set_current_item_smooth(0, false);
    pager.begin_drag();
    pager.drag_by(-60.0);
    pager.end_drag(-1_500.0);
    pager.tick(now + 1_000);

    let window: Vec<_> = pager.container().children().iter().map(|c| c.view).collect();
    println!(
        "current={} virtual={} window={window:?}",
        IMAGES[pager.current_item()],
        pager.virtual_current_item(),
    );
}
