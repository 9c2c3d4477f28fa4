use std::collections::HashMap;

use leptos::prelude::*;
use leptos::task::spawn_local;

use site_types::{PERIOD_TABLE, Period, format_year};

use crate::types::{SiteEntry, fetch_sites};

fn bounds_label(period: Period) -> String {
    match period.bounds() {
        (None, Some(u)) => format!("before {}", format_year(u)),
        (Some(f), None) => format!("{} onward", format_year(f)),
        (Some(f), Some(u)) => format!("{} – {}", format_year(f), format_year(u)),
        (None, None) => String::new(),
    }
}

#[component]
pub fn PeriodsPage() -> impl IntoView {
    let data: RwSignal<Option<Result<Vec<SiteEntry>, String>>> = RwSignal::new(None);

    spawn_local(async move {
        data.set(Some(fetch_sites().await));
    });

    view! {
        <div>
            <h2>"Periods"</h2>
            <p style="color:#7a6e5f;font-size:0.9rem;margin-bottom:1rem;">
                "Sites without a recorded period are placed by year using this table."
            </p>
            {move || match data.get() {
                None => view! { <p class="loading">"Loading…"</p> }.into_any(),
                Some(Err(e)) => view! { <p class="error">{e}</p> }.into_any(),
                Some(Ok(sites)) => {
                    let mut counts: HashMap<String, usize> = HashMap::new();
                    for s in &sites {
                        *counts.entry(s.derived_period.clone()).or_default() += 1;
                    }
                    let mut others: Vec<(String, usize)> = counts
                        .iter()
                        .filter(|(p, _)| Period::from_label(p).is_none())
                        .map(|(p, n)| (p.clone(), *n))
                        .collect();
                    others.sort();

                    view! {
                        <div class="card">
                            {PERIOD_TABLE.iter().map(|entry| {
                                let period = entry.period;
                                let name = period.as_str();
                                let count = counts.get(name).copied().unwrap_or(0);
                                view! {
                                    <div class="era-row">
                                        <span class="era-name">{name}</span>
                                        <span class="era-years">{bounds_label(period)}</span>
                                        <span class="era-count">{count} " sites"</span>
                                    </div>
                                }
                            }).collect_view()}
                            {others.into_iter().map(|(name, count)| view! {
                                <div class="era-row">
                                    <span class="era-name">{name}</span>
                                    <span class="era-years">"recorded label"</span>
                                    <span class="era-count">{count} " sites"</span>
                                </div>
                            }).collect_view()}
                        </div>
                    }.into_any()
                }
            }}
        </div>
    }
}
