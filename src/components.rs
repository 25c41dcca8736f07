//! Yew view components for the BarTab Roulette UI.
//!
//! Most components here are stateless and render from props; `NameForm`
//! keeps only its own input and confirmation-dialog state.

use crate::hooks::use_name_input;
use bartab_roulette::config::{
    LABEL_RADIUS_PX, MAX_NAME_LENGTH, MAX_PARTICIPANTS, SELECTED_PAYER_COLOR,
};
use bartab_roulette::precision::to_css_pixel;
use bartab_roulette::registry::RegistryError;
use bartab_roulette::spin::CalculationPhase;
use bartab_roulette::{segment_bounds, Participant};
use std::rc::Rc;
use yew::prelude::*;

/// `conic-gradient` background with one equal slice per participant.
///
/// The highlighted participant's slice is painted gold.
pub fn conic_gradient(participants: &[Participant], highlighted: Option<&str>) -> String {
    let count = participants.len();
    let parts = participants
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let (start, end) = segment_bounds(i, count);
            let color = if highlighted == Some(p.id.as_str()) {
                SELECTED_PAYER_COLOR
            } else {
                p.color
            };
            format!("{} {}deg {}deg", color, start, end)
        })
        .collect::<Vec<_>>();
    format!("conic-gradient({})", parts.join(", "))
}

/// Label offset from the wheel center for segment `index`, in pixels.
pub fn label_position(index: usize, count: usize) -> (f64, f64) {
    let (start, end) = segment_bounds(index, count);
    let center = ((start + end) / 2.0).to_radians();
    let angle = center - std::f64::consts::FRAC_PI_2;
    (angle.cos() * LABEL_RADIUS_PX, angle.sin() * LABEL_RADIUS_PX)
}

/// Renders one participant's name at the middle of its slice.
pub fn render_wheel_label(participant: &Participant, index: usize, count: usize, highlighted: bool) -> Html {
    let (x, y) = label_position(index, count);
    let class = classes!("wheel-label", highlighted.then_some("wheel-label-selected"));
    html! {
        <div key={participant.id.clone()}
            class={class}
            style={format!("left: calc(50% + {}); top: calc(50% + {});", to_css_pixel(x), to_css_pixel(y))}
        >
            <span class="wheel-label-emoji">{ participant.emoji }</span>
            <span>{ &participant.name }</span>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct CalculationOverlayProps {
    pub phase: CalculationPhase,
}

/// Overlay shown over the wheel between the stop and the reveal.
#[function_component(CalculationOverlay)]
pub fn calculation_overlay(props: &CalculationOverlayProps) -> Html {
    let body = match props.phase {
        CalculationPhase::Idle => return html! {},
        CalculationPhase::DrumRoll => html! {
            <>
                <div class="overlay-icon pulse">{ "🥁" }</div>
                <div class="overlay-text bounce">{ "Drum roll..." }</div>
                <div class="overlay-dots">
                    <span class="dot" /><span class="dot delay-100" /><span class="dot delay-200" />
                </div>
            </>
        },
        CalculationPhase::Calculating => html! {
            <>
                <div class="overlay-icon spin">{ "⚙️" }</div>
                <div class="overlay-text">{ "Measuring precisely..." }</div>
            </>
        },
        CalculationPhase::Result => html! {
            <>
                <div class="overlay-icon bounce">{ "💸" }</div>
                <div class="overlay-text">{ "Payer decided!" }</div>
            </>
        },
        CalculationPhase::Error => html! {
            <>
                <div class="overlay-icon">{ "❌" }</div>
                <div class="overlay-text overlay-error">{ "Calculation error" }</div>
                <div class="overlay-subtext">{ "Dismissing automatically..." }</div>
            </>
        },
    };
    html! { <div class="calculation-overlay">{ body }</div> }
}

#[derive(Properties, PartialEq)]
pub struct NameFormProps {
    pub participants: Rc<Vec<Participant>>,
    /// Try to add a participant with the given name.
    pub on_add: Callback<String, Result<(), RegistryError>>,
    pub on_remove: Callback<String>,
    pub on_reset: Callback<()>,
    /// Pending payer while the wheel turns; its row is highlighted.
    pub selected_payer: Option<Participant>,
    /// How many more participants are needed before the wheel can spin.
    pub missing: usize,
    /// The roster is at capacity; the add form is hidden.
    pub full: bool,
}

/// Participant entry form, participant list and reset dialog.
#[function_component(NameForm)]
pub fn name_form(props: &NameFormProps) -> Html {
    let input = use_name_input();
    let show_reset_confirm = use_state(|| false);
    let count = props.participants.len();

    let onsubmit = {
        let on_add = props.on_add.clone();
        let text = input.text.clone();
        let set_error = input.set_error.clone();
        let reset = input.reset.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            match on_add.emit(text.clone()) {
                Ok(()) => reset.emit(()),
                Err(err) => set_error.emit(err.to_string()),
            }
        })
    };

    let open_reset = {
        let show_reset_confirm = show_reset_confirm.clone();
        Callback::from(move |_| show_reset_confirm.set(true))
    };
    let cancel_reset = {
        let show_reset_confirm = show_reset_confirm.clone();
        Callback::from(move |_| show_reset_confirm.set(false))
    };
    let confirm_reset = {
        let show_reset_confirm = show_reset_confirm.clone();
        let on_reset = props.on_reset.clone();
        Callback::from(move |_| {
            on_reset.emit(());
            show_reset_confirm.set(false);
        })
    };

    let missing = props.missing;

    html! {
        <div class="name-form">
            if !props.full {
                <form class="add-form" {onsubmit}>
                    <div class="add-row">
                        <input
                            type="text"
                            class="name-input"
                            placeholder="Enter a participant name"
                            maxlength={MAX_NAME_LENGTH.to_string()}
                            value={input.text.clone()}
                            oninput={input.on_text_input.clone()}
                        />
                        <button type="submit"
                            class="add-button"
                            title={format!("Add participant ({}/{})", count, MAX_PARTICIPANTS)}
                        >
                            { "➕" }
                        </button>
                    </div>
                    if let Some(ref err) = input.error {
                        <p class="input-error">{ err }</p>
                    }
                </form>
            }

            <div class="participant-list">
                <div class="participant-list-header">
                    <h3>{ format!("Participants ({}/{})", count, MAX_PARTICIPANTS) }</h3>
                    if count > 0 {
                        <button class="reset-button" title="Reset participants" onclick={open_reset}>
                            <span>{ "🔄" }</span>
                            <span class="reset-label">{ "Reset" }</span>
                        </button>
                    }
                </div>

                if count == 0 {
                    <p class="no-participants">{ "Add some participants" }</p>
                } else {
                    <div class="participant-rows">
                        { props.participants.iter().map(|p| {
                            let selected = props.selected_payer.as_ref().map(|s| s.id == p.id).unwrap_or(false);
                            render_participant_row(p, selected, props.on_remove.clone())
                        }).collect::<Html>() }
                    </div>
                }
            </div>

            if missing > 0 && count > 0 {
                <div class="game-status">
                    <p>{ format!("{} more participant(s) needed to start", missing) }</p>
                </div>
            }

            if *show_reset_confirm {
                <div class="dialog-backdrop">
                    <div class="dialog">
                        <h3>{ "Reset participants" }</h3>
                        <p>{ "Really clear the whole participant list? This cannot be undone." }</p>
                        <div class="dialog-actions">
                            <button class="btn-secondary" onclick={cancel_reset}>{ "Cancel" }</button>
                            <button class="btn-danger" onclick={confirm_reset}>{ "Reset" }</button>
                        </div>
                    </div>
                </div>
            }
        </div>
    }
}

/// Renders a single participant row with its remove button.
fn render_participant_row(participant: &Participant, selected: bool, on_remove: Callback<String>) -> Html {
    // Hex alpha suffix: 50% when selected, 25% otherwise
    let (background, border) = if selected {
        (format!("{}80", participant.color), "#FFFFFF".to_string())
    } else {
        (format!("{}40", participant.color), format!("{}40", participant.color))
    };
    let id = participant.id.clone();
    html! {
        <div key={participant.id.clone()}
            class={classes!("participant-row", selected.then_some("selected"))}
            style={format!("background-color: {}; border-color: {};", background, border)}
        >
            <div class="participant-info">
                <span class="participant-emoji">{ participant.emoji }</span>
                <span class="participant-name">{ &participant.name }</span>
            </div>
            <div class="participant-actions">
                if selected {
                    <span class="payer-marker">{ "👈" }</span>
                }
                <button class="remove-button"
                    title="Remove participant"
                    onclick={Callback::from(move |_| on_remove.emit(id.clone()))}
                >
                    { "👋" }
                </button>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ResultModalProps {
    pub winner: Option<Participant>,
    pub on_close: Callback<()>,
}

/// Announces the committed payer. Clicking the backdrop or the button closes it.
#[function_component(ResultModal)]
pub fn result_modal(props: &ResultModalProps) -> Html {
    let Some(winner) = props.winner.as_ref() else {
        return html! {};
    };

    let close = props.on_close.reform(|_: MouseEvent| ());
    let keep_open = Callback::from(|e: MouseEvent| e.stop_propagation());

    html! {
        <div class="modal-backdrop" onclick={close.clone()}>
            <div class="modal-card"
                style={format!("background-color: {}80;", winner.color)}
                onclick={keep_open}
            >
                <div class="coin-rain">
                    { (0..12).map(|i| html! {
                        <span class="coin" style={format!("left: {}%; animation-delay: {}ms;", (i * 37) % 100, (i * 173) % 2000)}>{ "🪙" }</span>
                    }).collect::<Html>() }
                </div>
                <div class="winner-card" style={format!("background-color: {}80;", winner.color)}>
                    <div class="winner-emoji">{ winner.emoji }</div>
                    <div class="winner-name">{ &winner.name }</div>
                    <div class="winner-message">{ "is buying this round!" }</div>
                </div>
                <button class="again-button" onclick={close}>{ "Spin again" }</button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bartab_roulette::registry::ParticipantRegistry;

    fn three() -> Vec<Participant> {
        let mut registry = ParticipantRegistry::new();
        for name in ["A", "B", "C"] {
            registry.add(name).unwrap();
        }
        registry.participants().to_vec()
    }

    #[test]
    fn test_conic_gradient_slices() {
        let list = three();
        let css = conic_gradient(&list, None);
        assert_eq!(
            css,
            "conic-gradient(#FF0000 0deg 120deg, #87CEEB 120deg 240deg, #0000FF 240deg 360deg)"
        );
    }

    #[test]
    fn test_conic_gradient_highlight() {
        let list = three();
        let css = conic_gradient(&list, Some(list[1].id.as_str()));
        assert!(css.contains("#F7DC6F 120deg 240deg"));
        assert!(!css.contains("#87CEEB"));
    }

    #[test]
    fn test_label_position_first_slice_top_right() {
        // Two slices: first label centered at 90° from 12 o'clock, i.e. 3 o'clock
        let (x, y) = label_position(0, 2);
        assert!((x - LABEL_RADIUS_PX).abs() < 1e-9);
        assert!(y.abs() < 1e-9);
        let (x, y) = label_position(1, 2);
        assert!((x + LABEL_RADIUS_PX).abs() < 1e-9);
        assert!(y.abs() < 1e-9);
    }
}
