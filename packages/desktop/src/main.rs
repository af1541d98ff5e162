use dioxus::prelude::*;
use tracing_subscriber::EnvFilter;
use views::{Home, Login};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Home {},
    #[route("/login")]
    Login {},
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        ui::AuthProvider {
            Router::<Route> {}
        }
    }
}
