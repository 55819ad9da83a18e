use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::SystemTime;

use glance_config::Config;
use glance_core::selection::{RegionSelector, SelectionPhase};
use glance_types::{AppEvent, CommittedRegion, SUPPORTED_LANGUAGES};
use kanal::{AsyncReceiver, AsyncSender};
use slint::{ComponentHandle, Rgba8Pixel, SharedPixelBuffer, VecModel};
use tokio::sync::RwLock;

mod state;

use state::DetachedState;

slint::include_modules!();

pub async fn ui_loop(
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    ui_to_app_tx: AsyncSender<AppEvent>,
    config: Arc<RwLock<Config>>,
) -> anyhow::Result<()> {
    let (min_region, detached_size, default_source, default_target) = {
        let config = config.read().await;
        (
            config.capture.min_region,
            (config.ui.detached_width, config.ui.detached_height),
            config.ui.source_lang.clone(),
            config.ui.target_lang.clone(),
        )
    };

    let window = MainWindow::new()?;
    let window_weak = window.as_weak();

    let names: Vec<slint::SharedString> =
        SUPPORTED_LANGUAGES.iter().map(|l| l.name.into()).collect();
    window.set_languages(Rc::new(VecModel::from(names)).into());
    window.set_source_index(lang_index(&default_source));
    window.set_target_index(lang_index(&default_target));

    let selector = Rc::new(RefCell::new(RegionSelector::new(min_region)));
    let detached = Rc::new(RefCell::new(DetachedState::default()));

    // Capture lifecycle controls
    {
        let tx = ui_to_app_tx.clone();
        window.on_start_capture(move || send_event(&tx, AppEvent::StartCapture));
    }
    {
        let tx = ui_to_app_tx.clone();
        window.on_stop_capture(move || send_event(&tx, AppEvent::StopCapture));
    }
    {
        let tx = ui_to_app_tx.clone();
        window.on_toggle_auto(move || send_event(&tx, AppEvent::ToggleAuto));
    }
    {
        let tx = ui_to_app_tx.clone();
        window.on_manual_translate(move || send_event(&tx, AppEvent::ManualTranslate));
    }
    {
        let tx = ui_to_app_tx.clone();
        window.on_target_changed(move |index| {
            send_event(&tx, AppEvent::SetTargetLanguage(lang_code(index)));
        });
    }

    // Region selection: the gesture state machine runs here, the committed
    // region is pushed to the backend for sampling.
    {
        let selector = selector.clone();
        let tx = ui_to_app_tx.clone();
        let weak = window_weak.clone();
        window.on_toggle_region(move || {
            let mut selector = selector.borrow_mut();
            selector.toggle();
            if let Some(window) = weak.upgrade() {
                window.set_region_mode(selector.phase() != SelectionPhase::Inactive);
                window.set_sel_visible(false);
            }
            if selector.committed().is_none() {
                send_event(&tx, AppEvent::RegionUpdate { region: None });
            }
        });
    }
    {
        let selector = selector.clone();
        let weak = window_weak.clone();
        window.on_pointer_down(move |x, y| {
            let mut selector = selector.borrow_mut();
            selector.pointer_down(x, y);
            if let Some(window) = weak.upgrade() {
                sync_drag_rect(&window, &selector);
            }
        });
    }
    {
        let selector = selector.clone();
        let weak = window_weak.clone();
        window.on_pointer_moved(move |x, y| {
            let mut selector = selector.borrow_mut();
            selector.pointer_move(x, y);
            if let Some(window) = weak.upgrade() {
                sync_drag_rect(&window, &selector);
            }
        });
    }
    {
        let selector = selector.clone();
        let tx = ui_to_app_tx.clone();
        let weak = window_weak.clone();
        window.on_pointer_up(move || {
            let was_dragging = selector.borrow().phase() == SelectionPhase::Dragging;
            if !was_dragging {
                return;
            }
            let committed = selector.borrow_mut().pointer_up();
            let Some(window) = weak.upgrade() else { return };
            match committed {
                Some(region) => {
                    window.set_sel_visible(true);
                    window.set_sel_x(region.x);
                    window.set_sel_y(region.y);
                    window.set_sel_w(region.width);
                    window.set_sel_h(region.height);
                    send_event(
                        &tx,
                        AppEvent::RegionUpdate {
                            region: Some(CommittedRegion {
                                region,
                                viewport_width: window.get_capture_w(),
                                viewport_height: window.get_capture_h(),
                            }),
                        },
                    );
                }
                None => {
                    window.set_sel_visible(false);
                    window.set_region_mode(false);
                    send_event(&tx, AppEvent::RegionUpdate { region: None });
                }
            }
        });
    }

    // Floating result window
    {
        let detached = detached.clone();
        let weak = window_weak.clone();
        window.on_toggle_detached(move || {
            let is_open = detached.borrow().window.is_some();
            let Some(window) = weak.upgrade() else { return };
            if is_open {
                detached.borrow_mut().close();
                window.set_detached(false);
            } else {
                match open_floating(&detached, weak.clone(), detached_size) {
                    Ok(()) => {
                        if let Some(floating) = detached.borrow().window.as_ref() {
                            floating.set_translation(window.get_translation());
                            floating.set_last_updated(window.get_last_updated());
                        }
                        window.set_detached(true);
                    }
                    Err(e) => {
                        // unsupported platform: keep rendering inline
                        tracing::warn!("floating window unavailable: {e}");
                        window.set_status("Floating window unavailable here".into());
                    }
                }
            }
        });
    }

    // Text / image tabs
    {
        let tx = ui_to_app_tx.clone();
        let weak = window_weak.clone();
        window.on_translate_text(move || {
            let Some(window) = weak.upgrade() else { return };
            send_event(
                &tx,
                AppEvent::TranslateText {
                    text: window.get_input_text().to_string(),
                    source: lang_code(window.get_source_index()),
                    target: lang_code(window.get_target_index()),
                },
            );
        });
    }
    {
        let weak = window_weak.clone();
        window.on_swap_languages(move || {
            let Some(window) = weak.upgrade() else { return };
            let source = window.get_source_index();
            window.set_source_index(window.get_target_index());
            window.set_target_index(source);
            let input = window.get_input_text();
            window.set_input_text(window.get_output_text());
            window.set_output_text(input);
        });
    }
    {
        let tx = ui_to_app_tx.clone();
        let weak = window_weak.clone();
        window.on_copy_output(move || {
            let Some(window) = weak.upgrade() else { return };
            send_event(&tx, AppEvent::CopyText(window.get_output_text().to_string()));
        });
    }
    {
        let tx = ui_to_app_tx.clone();
        let weak = window_weak.clone();
        window.on_edit_image(move || {
            let Some(window) = weak.upgrade() else { return };
            send_event(
                &tx,
                AppEvent::EditImage {
                    path: PathBuf::from(window.get_edit_path().to_string()),
                    instruction: window.get_edit_instruction().to_string(),
                },
            );
        });
    }
    {
        let tx = ui_to_app_tx.clone();
        let weak = window_weak.clone();
        window.on_analyze_image(move || {
            let Some(window) = weak.upgrade() else { return };
            let question = window.get_analyze_question().to_string();
            send_event(
                &tx,
                AppEvent::AnalyzeImage {
                    path: PathBuf::from(window.get_analyze_path().to_string()),
                    question: if question.trim().is_empty() {
                        None
                    } else {
                        Some(question)
                    },
                },
            );
        });
    }

    // Receive events from the backend
    {
        let selector = selector.clone();
        let detached = detached.clone();
        let window_weak = window.as_weak();
        slint::spawn_local(async move {
            while let Ok(event) = app_to_ui_rx.recv().await {
                let Some(window) = window_weak.upgrade() else { break };
                match event {
                    AppEvent::CaptureStarted { width, height } => {
                        selector.borrow_mut().reset();
                        window.set_capture_active(true);
                        window.set_region_mode(false);
                        window.set_sel_visible(false);
                        window.set_status(format!("Sharing {width}x{height}").into());
                    }
                    AppEvent::StatusUpdate { status, capturing } => {
                        window.set_status(status.into());
                        window.set_capture_active(capturing);
                        if !capturing {
                            window.set_auto_running(false);
                            // session teardown releases the floating surface
                            let mut detached = detached.borrow_mut();
                            if detached.window.is_some() {
                                detached.close();
                                window.set_detached(false);
                            }
                        }
                    }
                    AppEvent::AutoState { running } => {
                        window.set_auto_running(running);
                    }
                    AppEvent::ShowTranslation(result) => {
                        let stamp = format_time(result.produced_at);
                        if let Some(floating) = detached.borrow().window.as_ref() {
                            floating.set_translation(result.text.clone().into());
                            floating.set_last_updated(stamp.clone().into());
                        }
                        window.set_translation(result.text.into());
                        window.set_last_updated(stamp.into());
                    }
                    AppEvent::PreviewFrame(frame) => {
                        let buffer = SharedPixelBuffer::<Rgba8Pixel>::clone_from_slice(
                            &frame.rgba,
                            frame.width,
                            frame.height,
                        );
                        window.set_preview(slint::Image::from_rgba8(buffer));
                    }
                    AppEvent::ShowTextTranslation { text } => {
                        window.set_output_text(text.into());
                    }
                    AppEvent::ShowEditedImage { path } => {
                        window.set_edit_result(
                            format!("Saved edited image to {}", path.display()).into(),
                        );
                    }
                    AppEvent::ShowAnalysis { text } => {
                        window.set_analysis(text.into());
                    }
                    _ => {}
                }
            }
        })
        .unwrap();
    }

    window.show()?;
    window.run()?;

    Ok(())
}

fn send_event(tx: &AsyncSender<AppEvent>, event: AppEvent) {
    let tx = tx.clone();
    slint::spawn_local(async move {
        let _ = tx.send(event).await;
    })
    .unwrap();
}

fn sync_drag_rect(window: &MainWindow, selector: &RegionSelector) {
    if selector.phase() != SelectionPhase::Dragging {
        return;
    }
    let rect = selector.drag_rect();
    window.set_sel_x(rect.x);
    window.set_sel_y(rect.y);
    window.set_sel_w(rect.width);
    window.set_sel_h(rect.height);
    window.set_sel_visible(true);
}

fn open_floating(
    detached: &Rc<RefCell<DetachedState>>,
    main_weak: slint::Weak<MainWindow>,
    size: (u32, u32),
) -> anyhow::Result<()> {
    let floating = FloatingWindow::new()?;
    floating
        .window()
        .set_size(slint::PhysicalSize::new(size.0, size.1));
    {
        let detached = detached.clone();
        floating.window().on_close_requested(move || {
            detached.borrow_mut().window = None;
            if let Some(main) = main_weak.upgrade() {
                main.set_detached(false);
            }
            slint::CloseRequestResponse::HideWindow
        });
    }
    floating.show()?;
    detached.borrow_mut().window = Some(floating);
    Ok(())
}

fn lang_index(code: &str) -> i32 {
    SUPPORTED_LANGUAGES
        .iter()
        .position(|l| l.code == code)
        .unwrap_or(0) as i32
}

fn lang_code(index: i32) -> String {
    SUPPORTED_LANGUAGES
        .get(index.max(0) as usize)
        .map(|l| l.code.to_string())
        .unwrap_or_else(|| "en".to_string())
}

fn format_time(produced_at: SystemTime) -> String {
    let stamp: chrono::DateTime<chrono::Local> = produced_at.into();
    stamp.format("Updated %H:%M:%S").to_string()
}
