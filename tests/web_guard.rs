#![cfg(target_arch = "wasm32")]

use reservation_desk::{config::Config, dialog::Severity, guard::NavigationGuard};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

use web_fakes_::{document, init_logging, settle, Fixture, RecordingNavigator, ScriptedDialogs};

const LINKS: &str = r#"
	<a class="btn-update-reservation" href="/dashboard_reservations/manage/42/status">Atualizar</a>
	<a class="btn-cancel-reservation" href="/dashboard_reservations/cancel/42">Cancelar</a>
	<a class="unguarded" href="/dashboard_reservations">Voltar</a>
"#;

fn guard(dialogs: &ScriptedDialogs, navigator: &RecordingNavigator) -> NavigationGuard<ScriptedDialogs, RecordingNavigator> {
	NavigationGuard::new(&document(), &Config::default(), dialogs.clone(), navigator.clone()).expect("guarded links are present")
}

#[wasm_bindgen_test]
fn nothing_to_guard() {
	init_logging();
	assert!(NavigationGuard::new(&document(), &Config::default(), ScriptedDialogs::default(), RecordingNavigator::default()).is_none());
}

#[wasm_bindgen_test]
async fn declined_prompt_stays() {
	init_logging();
	let fixture = Fixture::new(LINKS);
	let dialogs = ScriptedDialogs::answering(&[false]);
	let navigator = RecordingNavigator::default();
	let guard = guard(&dialogs, &navigator);

	assert!(!guard.confirm_navigation(&fixture.get(".btn-cancel-reservation")).await);
	assert!(navigator.visited().is_empty());

	let shown = dialogs.shown();
	assert_eq!(shown[0].title, "Cancelar esta reserva?");
	assert_eq!(shown[0].severity, Severity::Warning);
}

#[wasm_bindgen_test]
async fn confirmed_prompt_navigates() {
	init_logging();
	let fixture = Fixture::new(LINKS);
	let dialogs = ScriptedDialogs::answering(&[true]);
	let navigator = RecordingNavigator::default();
	let guard = guard(&dialogs, &navigator);

	assert!(guard.confirm_navigation(&fixture.get(".btn-update-reservation")).await);
	assert_eq!(navigator.visited(), vec!["/dashboard_reservations/manage/42/status"]);
	assert_eq!(dialogs.shown()[0].title, "Atualizar a situação da reserva?");
}

#[wasm_bindgen_test]
async fn unguarded_links_are_ignored() {
	init_logging();
	let fixture = Fixture::new(LINKS);
	let dialogs = ScriptedDialogs::answering(&[true]);
	let navigator = RecordingNavigator::default();
	let guard = guard(&dialogs, &navigator);

	assert!(!guard.confirm_navigation(&fixture.get(".unguarded")).await);
	assert!(dialogs.shown().is_empty());
	assert!(navigator.visited().is_empty());
}

#[wasm_bindgen_test]
async fn clicks_wait_for_consent() {
	init_logging();
	let fixture = Fixture::new(LINKS);
	let dialogs = ScriptedDialogs::answering(&[true]);
	let navigator = RecordingNavigator::default();
	let _guard = guard(&dialogs, &navigator);

	fixture.get::<HtmlElement>(".btn-cancel-reservation").click();
	settle().await;
	assert_eq!(dialogs.shown().len(), 1);
	assert_eq!(navigator.visited(), vec!["/dashboard_reservations/cancel/42"]);
}
