//! The roulette wheel and the spin that runs on top of it.
//!
//! A spin has two timers while the pointer moves: one writes the eased
//! rotation to the pointer's transform, the other reads the rendered
//! transform back and publishes the pending payer. Once the pointer stops,
//! the precise resolution runs alongside the drum roll and alone decides
//! the winner.

use crate::components::{conic_gradient, render_wheel_label, CalculationOverlay};
use crate::hooks::use_hint_cycle;
use crate::utils::{apply_rotation, measure_pointer, now_ms, read_rotation};
use bartab_roulette::config::{
    INSUFFICIENT_PARTICIPANTS, POINTER_AXIS_X_RATIO, POINTER_AXIS_Y_RATIO,
    POINTER_INITIAL_ROTATION_DEG, SPINNING_TEXT, UPDATE_INTERVAL_MS,
};
use bartab_roulette::precision::to_css_percentage;
use bartab_roulette::spin::{
    calculating_ms, drum_roll_ms, CalculationPhase, SpinController, SpinPlan,
};
use bartab_roulette::{resolve_precise, Participant, PointerGeometry};
use futures::channel::oneshot;
use gloo_timers::callback::{Interval, Timeout};
use gloo_timers::future::TimeoutFuture;
use log::{debug, error, info};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::{Element, HtmlElement};
use yew::prelude::*;

const POINTER_IMAGE: &str = "bottle_opener.png";

/// Timers owned by the running spin. Dropping a handle cancels it.
#[derive(Default)]
struct SpinTimers {
    rotation: Option<Interval>,
    tracking: Option<Interval>,
    dismiss: Option<Timeout>,
}

impl SpinTimers {
    fn stop_motion(&mut self) {
        self.rotation = None;
        self.tracking = None;
    }

    fn cancel(&mut self) {
        self.stop_motion();
        self.dismiss = None;
    }
}

/// Shared handles the spin task works through.
#[derive(Clone)]
struct SpinContext {
    pointer_ref: NodeRef,
    controller: Rc<RefCell<SpinController>>,
    participants: Rc<RefCell<Rc<Vec<Participant>>>>,
    timers: Rc<RefCell<SpinTimers>>,
    /// Bumped whenever the running spin is abandoned.
    token: Rc<RefCell<u32>>,
    phase: UseStateHandle<CalculationPhase>,
    is_spinning: UseStateHandle<bool>,
    selected_payer: UseStateHandle<Option<Participant>>,
    on_payer_selected: Callback<Participant>,
    on_current_payer_change: Callback<Option<Participant>>,
}

impl SpinContext {
    fn current_token(&self) -> u32 {
        *self.token.borrow()
    }

    fn is_current(&self, token: u32) -> bool {
        self.current_token() == token
    }

    fn sync_phase(&self) {
        let phase = self.controller.borrow().phase();
        self.phase.set(phase);
    }

    fn participants(&self) -> Rc<Vec<Participant>> {
        self.participants.borrow().clone()
    }

    /// Lightweight pass: publish the pending payer when it changes.
    fn track(&self, pointer: &Element) {
        let rotation = read_rotation(pointer);
        let participants = self.participants();
        let payer = self
            .controller
            .borrow_mut()
            .track(&participants, rotation)
            .cloned();
        if let Some(payer) = payer {
            self.selected_payer.set(Some(payer.clone()));
            self.on_current_payer_change.emit(Some(payer));
        }
    }

    /// Abandon whatever spin is in flight without producing a result.
    fn halt(&self) {
        *self.token.borrow_mut() += 1;
        self.timers.borrow_mut().cancel();
        self.controller.borrow_mut().abort();
        self.is_spinning.set(false);
        self.phase.set(CalculationPhase::Idle);
        self.selected_payer.set(None);
    }
}

async fn run_spin(ctx: SpinContext, plan: SpinPlan, pointer: HtmlElement) {
    let token = ctx.current_token();
    let (done_tx, done_rx) = oneshot::channel::<()>();

    {
        let started = now_ms();
        let rotation = {
            let pointer = pointer.clone();
            let mut done_tx = Some(done_tx);
            Interval::new(UPDATE_INTERVAL_MS, move || {
                let elapsed = (now_ms() - started) / 1000.0;
                apply_rotation(&pointer, plan.rotation_at(elapsed));
                if plan.is_finished(elapsed) {
                    if let Some(tx) = done_tx.take() {
                        let _ = tx.send(());
                    }
                }
            })
        };
        let tracking = {
            let ctx = ctx.clone();
            let pointer = pointer.clone();
            Interval::new(UPDATE_INTERVAL_MS, move || ctx.track(&pointer))
        };
        let mut timers = ctx.timers.borrow_mut();
        timers.rotation = Some(rotation);
        timers.tracking = Some(tracking);
    }

    // Cancelled when the rotation timer is dropped by `halt`
    if done_rx.await.is_err() || !ctx.is_current(token) {
        return;
    }

    ctx.timers.borrow_mut().stop_motion();
    if !ctx.controller.borrow_mut().settle() {
        return;
    }
    ctx.is_spinning.set(false);
    ctx.sync_phase();
    ctx.selected_payer.set(None);
    ctx.on_current_payer_change.emit(None);
    debug!("Pointer stopped, starting precise resolution");

    let measure = async {
        let pointer = ctx.pointer_ref.cast::<Element>();
        let rect = pointer.as_ref().map(measure_pointer);
        let rotation = pointer.as_ref().map(read_rotation).unwrap_or(0.0);
        let participants = ctx.participants();
        resolve_precise(
            &participants,
            rect.as_ref(),
            rotation,
            &PointerGeometry::default(),
        )
        .cloned()
    };
    let drama = async {
        TimeoutFuture::new(drum_roll_ms()).await;
        if ctx.is_current(token) {
            ctx.controller.borrow_mut().advance_drama();
            ctx.sync_phase();
        }
        TimeoutFuture::new(calculating_ms()).await;
    };
    let (outcome, ()) = futures::join!(measure, drama);

    if !ctx.is_current(token) {
        return;
    }
    let winner = ctx.controller.borrow_mut().commit(outcome);
    ctx.sync_phase();
    if let Some(winner) = winner {
        ctx.selected_payer.set(Some(winner.clone()));
        ctx.on_payer_selected.emit(winner);
    }

    let phase = ctx.controller.borrow().phase();
    if let Some(delay) = phase.auto_dismiss_ms() {
        let dismiss = {
            let ctx = ctx.clone();
            Timeout::new(delay, move || {
                ctx.controller.borrow_mut().finish();
                ctx.sync_phase();
            })
        };
        ctx.timers.borrow_mut().dismiss = Some(dismiss);
    }
}

#[derive(Properties, PartialEq)]
pub struct RouletteProps {
    pub participants: Rc<Vec<Participant>>,
    /// Enough participants are registered to spin.
    pub can_spin: bool,
    /// The committed payer of a finished spin.
    pub on_payer_selected: Callback<Participant>,
    /// Pending payer while spinning, `None` once the pointer stops.
    pub on_current_payer_change: Callback<Option<Participant>>,
    pub on_hint_text_change: Callback<Option<String>>,
}

#[function_component(Roulette)]
pub fn roulette(props: &RouletteProps) -> Html {
    let pointer_ref = use_node_ref();
    let controller = use_mut_ref(SpinController::new);
    let participants_ref = use_mut_ref(|| props.participants.clone());
    let timers = use_mut_ref(SpinTimers::default);
    let token = use_mut_ref(|| 0u32);
    let phase = use_state(CalculationPhase::default);
    let is_spinning = use_state(|| false);
    let selected_payer = use_state(|| None::<Participant>);

    *participants_ref.borrow_mut() = props.participants.clone();
    let count = props.participants.len();
    let can_spin = props.can_spin;

    use_hint_cycle(can_spin && !*is_spinning, props.on_hint_text_change.clone());

    let ctx = SpinContext {
        pointer_ref: pointer_ref.clone(),
        controller,
        participants: participants_ref,
        timers,
        token,
        phase: phase.clone(),
        is_spinning: is_spinning.clone(),
        selected_payer: selected_payer.clone(),
        on_payer_selected: props.on_payer_selected.clone(),
        on_current_payer_change: props.on_current_payer_change.clone(),
    };

    // Fresh pointer at 12 o'clock whenever the wheel appears
    {
        let ctx = ctx.clone();
        use_effect_with(can_spin, move |&can_spin| {
            if can_spin {
                if let Some(pointer) = ctx.pointer_ref.cast::<HtmlElement>() {
                    apply_rotation(&pointer, POINTER_INITIAL_ROTATION_DEG);
                }
            }
            move || {
                if can_spin {
                    ctx.halt();
                }
            }
        });
    }

    let on_spin = {
        let ctx = ctx.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(pointer) = ctx.pointer_ref.cast::<HtmlElement>() else {
                error!("Pointer element is not mounted");
                return;
            };
            let start = read_rotation(&pointer);
            let count = ctx.participants.borrow().len();
            let plan = match ctx.controller.borrow_mut().begin(count, start, &mut rand::rng()) {
                Ok(plan) => plan,
                Err(e) => {
                    debug!("Spin request ignored: {}", e);
                    return;
                }
            };
            ctx.timers.borrow_mut().cancel();
            ctx.is_spinning.set(true);
            ctx.selected_payer.set(None);
            info!("Spinning across {} participants", count);
            wasm_bindgen_futures::spawn_local(run_spin(ctx.clone(), plan, pointer));
        })
    };

    if !can_spin {
        return html! {
            <div class="roulette-placeholder">
                <p>{ INSUFFICIENT_PARTICIPANTS }</p>
            </div>
        };
    }

    let highlighted = (*selected_payer).as_ref().map(|p| p.id.as_str());
    let pointer_style = format!(
        "transform-origin: {} {}; filter: drop-shadow(2px 4px 6px rgba(0, 0, 0, 0.4));",
        to_css_percentage(POINTER_AXIS_X_RATIO * 100.0, 2),
        to_css_percentage(POINTER_AXIS_Y_RATIO * 100.0, 2),
    );

    html! {
        <div class="roulette">
            <div class="roulette-wheel"
                style={format!("background: {};", conic_gradient(&props.participants, highlighted))}
            >
                { props.participants.iter().enumerate().map(|(i, p)| {
                    render_wheel_label(p, i, count, highlighted == Some(p.id.as_str()))
                }).collect::<Html>() }
            </div>
            <div class="roulette-hub" />
            <img ref={pointer_ref}
                class="roulette-pointer"
                src={POINTER_IMAGE}
                alt="Bottle opener"
                style={pointer_style}
            />
            <button class="spin-button"
                aria-label="Spin the roulette"
                disabled={*is_spinning || !phase.is_idle()}
                onclick={on_spin}
            />
            <CalculationOverlay phase={*phase} />
            if *is_spinning {
                <p class="spinning-caption">{ SPINNING_TEXT }</p>
            }
        </div>
    }
}
