//! Main module for BarTab Roulette using Yew.
//! Wires the participant registry, the roulette and the result modal.

use bartab_roulette::config::{PAGE_FOOTER, PAGE_SUBTITLE, PAGE_TITLE};
use bartab_roulette::layout::DeviceType;
use bartab_roulette::registry::{ParticipantRegistry, RegistryError};
use bartab_roulette::Participant;
use log::{info, warn};
use std::rc::Rc;
use yew::prelude::*;

mod components;
mod hooks;
mod utils;
mod wheel;

use components::{NameForm, ResultModal};
use hooks::use_palette_css;
use wheel::Roulette;

// ──────────────────────────────────────────────────────────────────────────────
// Helper functions

/// Clear a highlighted payer that is no longer on the roster.
fn forget_if_removed(payer: &UseStateHandle<Option<Participant>>, removed_id: &str) {
    if (**payer).as_ref().map(|p| p.id == removed_id).unwrap_or(false) {
        payer.set(None);
    }
}

/// Root component: holds the roster and the payer shown across the page.
#[function_component]
pub fn App() -> Html {
    let device = use_palette_css();
    let registry = use_state(ParticipantRegistry::new);
    // Pending payer while spinning, then the committed one
    let current_payer = use_state(|| None::<Participant>);
    let modal_payer = use_state(|| None::<Participant>);
    let hint_text = use_state(|| None::<String>);

    let participants = Rc::new(registry.participants().to_vec());

    let on_add = {
        let registry = registry.clone();
        Callback::from(move |name: String| -> Result<(), RegistryError> {
            let mut next = (*registry).clone();
            next.add(&name)?;
            registry.set(next);
            Ok(())
        })
    };

    let on_remove = {
        let registry = registry.clone();
        let current_payer = current_payer.clone();
        Callback::from(move |id: String| {
            let mut next = (*registry).clone();
            if next.remove(&id).is_none() {
                warn!("Tried to remove unknown participant {}", id);
                return;
            }
            registry.set(next);
            forget_if_removed(&current_payer, &id);
        })
    };

    let on_reset = {
        let registry = registry.clone();
        let current_payer = current_payer.clone();
        let modal_payer = modal_payer.clone();
        Callback::from(move |_| {
            let mut next = (*registry).clone();
            next.clear();
            registry.set(next);
            current_payer.set(None);
            modal_payer.set(None);
        })
    };

    let on_payer_selected = {
        let current_payer = current_payer.clone();
        let modal_payer = modal_payer.clone();
        Callback::from(move |winner: Participant| {
            info!("{} buys the next round", winner.name);
            current_payer.set(Some(winner.clone()));
            modal_payer.set(Some(winner));
        })
    };

    let on_current_payer_change = {
        let current_payer = current_payer.clone();
        Callback::from(move |payer: Option<Participant>| current_payer.set(payer))
    };

    let on_hint_text_change = {
        let hint_text = hint_text.clone();
        Callback::from(move |text: Option<String>| hint_text.set(text))
    };

    let on_modal_close = {
        let modal_payer = modal_payer.clone();
        Callback::from(move |_| modal_payer.set(None))
    };

    let device_class = match device {
        DeviceType::Mobile => "mobile",
        DeviceType::Desktop => "desktop",
    };

    html! {
        <div class={classes!("app", device_class)}>
            <header class="app-header">
                <h1>{ PAGE_TITLE }</h1>
                <p class="subtitle">{ PAGE_SUBTITLE }</p>
            </header>

            <div class="hint-area">
                if let Some(text) = &*hint_text {
                    <p class="hint-text">{ text }</p>
                }
            </div>

            <main class="game-area">
                <Roulette
                    participants={participants.clone()}
                    can_spin={registry.can_spin()}
                    {on_payer_selected}
                    {on_current_payer_change}
                    {on_hint_text_change}
                />
                <NameForm
                    {participants}
                    {on_add}
                    {on_remove}
                    {on_reset}
                    selected_payer={(*current_payer).clone()}
                    missing={registry.missing_for_game()}
                    full={registry.is_full()}
                />
            </main>

            <footer class="app-footer">
                <p>{ PAGE_FOOTER }</p>
            </footer>

            <ResultModal winner={(*modal_payer).clone()} on_close={on_modal_close} />
        </div>
    }
}

/// Entry point: installs logging and the panic hook, then renders the App.
fn main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
    info!("Starting {}", PAGE_TITLE);
    yew::Renderer::<App>::new().render();
}
