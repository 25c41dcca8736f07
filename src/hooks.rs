use crate::utils::{current_device, now_ms, set_css_variables};
use bartab_roulette::config::{HINT_TEXT, HINT_TICK_MS};
use bartab_roulette::layout::{DeviceType, PaletteConfig};
use bartab_roulette::spin::hint_visible;
use gloo_events::EventListener;
use gloo_timers::callback::Interval;
use log::{debug, error};
use std::rc::Rc;
use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Holds the state and callbacks for the participant name field.
#[derive(Clone)]
pub struct NameInput {
    /// The current text content of the input field.
    pub text: String,
    /// An optional error message if the last submission was rejected.
    pub error: Option<String>,
    /// Callback for the text input's `oninput` event. Updates the internal text state.
    pub on_text_input: Callback<InputEvent>,
    /// Report a rejected submission; the text is kept so the user can fix it.
    pub set_error: Callback<String>,
    /// Clear text and error after a successful submission.
    pub reset: Callback<()>,
}

/// Custom hook to manage state for the name input field.
#[hook]
pub fn use_name_input() -> NameInput {
    let text_handle = use_state(String::new);
    let error_handle = use_state(|| None::<String>);

    let on_text_input = {
        let text_setter = text_handle.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            text_setter.set(input.value());
        })
    };

    let set_error = {
        let error_setter = error_handle.clone();
        Callback::from(move |msg: String| error_setter.set(Some(msg)))
    };

    let reset = {
        let text_setter = text_handle.clone();
        let error_setter = error_handle.clone();
        Callback::from(move |_| {
            text_setter.set(String::new());
            error_setter.set(None);
        })
    };

    NameInput {
        text: (*text_handle).clone(),
        error: (*error_handle).clone(),
        on_text_input,
        set_error,
        reset,
    }
}

/// Show the idle hint on the `hint_visible` schedule while `active`; hide it
/// as soon as `active` turns false.
#[hook]
pub fn use_hint_cycle(active: bool, on_change: Callback<Option<String>>) {
    use_effect_with(active, move |&active| {
        let mut ticker = None;

        if active {
            let started = now_ms();
            let mut shown = None::<bool>;
            let mut update = move || {
                let elapsed = (now_ms() - started).max(0.0) as u64;
                let visible = hint_visible(active, elapsed);
                if shown != Some(visible) {
                    shown = Some(visible);
                    on_change.emit(visible.then(|| HINT_TEXT.to_string()));
                }
            };
            update();
            ticker = Some(Interval::new(HINT_TICK_MS, update));
        } else {
            on_change.emit(None);
        }

        // Dropping the handle cancels the ticker
        move || drop(ticker)
    });
}

/// Keep the palette CSS variables in sync with the viewport.
///
/// Recomputes on mount, resize and orientation change, and returns the
/// device class the values were computed for.
#[hook]
pub fn use_palette_css() -> DeviceType {
    let device = use_state(current_device);

    {
        let device = device.clone();
        use_effect_with((), move |_| {
            let apply = Rc::new(move || {
                let current = current_device();
                match PaletteConfig::for_device(current) {
                    Ok(config) => set_css_variables(&config),
                    Err(e) => error!("Palette calculation failed: {}", e),
                }
                device.set(current);
            });
            apply();

            let window = gloo_utils::window();
            let on_resize = {
                let apply = apply.clone();
                EventListener::new(&window, "resize", move |_| apply())
            };
            let on_orientation = EventListener::new(&window, "orientationchange", move |_| apply());
            debug!("Palette CSS listeners registered");

            move || {
                drop(on_resize);
                drop(on_orientation);
            }
        });
    }

    *device
}
