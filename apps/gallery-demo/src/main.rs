mod page;

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use mosaic_foundation::DataItem;
use mosaic_ui::{MasonrySpec, VirtualMasonry};
use web_time::Instant;

use page::SimulatedPage;

const PAGE_SIZE: usize = 60;
const MAX_PAGES: usize = 5;
const FRAME: Duration = Duration::from_millis(16);

const PHOTO_SIZES: [(f32, f32); 5] = [
    (4000.0, 3000.0),
    (3000.0, 4000.0),
    (1920.0, 1080.0),
    (2048.0, 2048.0),
    (3000.0, 2000.0),
];

fn fetch_page(page: usize) -> Vec<DataItem> {
    (page * PAGE_SIZE..(page + 1) * PAGE_SIZE)
        .map(|i| {
            let (w, h) = PHOTO_SIZES[(i * 7) % PHOTO_SIZES.len()];
            DataItem::new(format!("photo-{i}"), w, h)
        })
        .collect()
}

fn main() {
    #[cfg(feature = "logging")]
    let _ = env_logger::try_init();

    let append_requested = Rc::new(Cell::new(false));
    let settled_frames = Rc::new(Cell::new(0usize));

    let requested = append_requested.clone();
    let settled = settled_frames.clone();
    let render_photo = |photo: &DataItem, n: usize| format!("#{n} {}", photo.id);
    let mut gallery = match VirtualMasonry::new(MasonrySpec::default(), 1280.0, render_photo) {
        Ok(gallery) => gallery
            .on_request_append(move || requested.set(true))
            .on_render_complete(move || settled.set(settled.get() + 1)),
        Err(err) => {
            log::error!("gallery spec rejected: {err}");
            return;
        }
    };

    let mut page = SimulatedPage::new(1280.0, 800.0, 120.0);
    gallery.mount(&mut page);

    let mut photos = fetch_page(0);
    let mut pages_loaded = 1;
    gallery.set_data_source(photos.clone().into());
    gallery.set_has_next_page(pages_loaded < MAX_PAGES);

    let mut now = Instant::now();
    page.resize(1280.0, now);

    for frame in 0..600 {
        now += FRAME;
        gallery.tick(now);

        if append_requested.replace(false) && pages_loaded < MAX_PAGES {
            photos.extend(fetch_page(pages_loaded));
            pages_loaded += 1;
            log::info!("loaded page {pages_loaded} ({} photos)", photos.len());
            gallery.set_data_source(photos.clone().into());
            gallery.set_has_next_page(pages_loaded < MAX_PAGES);
        }

        let rendered = gallery.render();
        page.set_content(rendered.content_height, rendered.sentinel_top, now);

        if frame == 300 {
            // Rotate to a narrow window halfway through.
            page.resize(700.0, now);
        }
        page.scroll_by(90.0, now);

        if frame % 60 == 0 {
            let info = gallery.state().layout_info();
            log::info!(
                "frame {frame}: {} of {} photos materialized, {} columns, scroll {:.0}/{:.0}",
                rendered.items.len(),
                info.total_items_count,
                info.column_count,
                info.scroll_top,
                info.content_height
            );
        }
    }

    let info = gallery.state().layout_info();
    println!(
        "pages loaded: {pages_loaded}, photos: {}, columns: {}, window: {:?}, settled renders: {}",
        info.total_items_count,
        info.column_count,
        info.visible_range,
        settled_frames.get()
    );
}
