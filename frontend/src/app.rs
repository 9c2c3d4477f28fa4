use leptos::prelude::*;
use leptos_router::{
    components::{A, Route, Router, Routes},
    path,
};

use crate::pages::{periods::PeriodsPage, sites::SitesPage};

#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <div id="app">
                <header>
                    <h1>"Historic sites"</h1>
                    <nav>
                        <A href="/">"Sites"</A>
                        <A href="/periods">"Periods"</A>
                    </nav>
                </header>
                <main>
                    <Routes fallback=|| {
                        view! { <p class="error">"Page not found"</p> }
                    }>
                        <Route path=path!("/") view=SitesPage/>
                        <Route path=path!("/periods") view=PeriodsPage/>
                    </Routes>
                </main>
                <footer>
                    <p>"Site data: /data/sites.json, written by site_map export"</p>
                </footer>
            </div>
        </Router>
    }
}
