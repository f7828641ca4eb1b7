use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tui_match3::core::{BoardEngine, BoardSnapshot};
use tui_match3::term::{FrameBuffer, GameView, Viewport};
use tui_match3::types::{BoardConfig, Position};

struct CountingAlloc;

static COUNT_ENABLED: AtomicBool = AtomicBool::new(false);
static ALLOC_COUNT: AtomicUsize = AtomicUsize::new(0);

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.realloc(ptr, layout, new_size)
    }
}

fn with_alloc_counting<F: FnOnce()>(f: F) -> usize {
    ALLOC_COUNT.store(0, Ordering::Relaxed);
    COUNT_ENABLED.store(true, Ordering::Relaxed);
    f();
    COUNT_ENABLED.store(false, Ordering::Relaxed);
    ALLOC_COUNT.load(Ordering::Relaxed)
}

#[test]
fn stable_frame_loop_is_allocation_free_after_warmup() {
    let view = GameView::default();
    let viewport = Viewport::new(80, 24);
    let mut fb = FrameBuffer::new(viewport.width, viewport.height);

    let mut engine = BoardEngine::with_seed(BoardConfig::default(), 1).unwrap();
    let mut snap = BoardSnapshot::default();

    // Warm-up (snapshot cells, initial clears).
    engine.snapshot_into(&mut snap);
    view.render_into(&snap, Some(Position::new(0, 0)), viewport, &mut fb);

    let allocs = with_alloc_counting(|| {
        for i in 0..200usize {
            let cursor = Position::new(i % 8, (i / 8) % 8);
            if i % 3 == 0 {
                let _ = engine.select(cursor);
            } else {
                engine.clear_selection();
            }
            let _ = engine.are_neighbours(Position::new(3, 3));
            let _ = engine.detect_and_clear(true);

            engine.snapshot_into(&mut snap);
            view.render_into(&snap, Some(cursor), viewport, &mut fb);
        }
    });

    assert_eq!(allocs, 0);
}
