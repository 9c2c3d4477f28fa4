use leptos::prelude::*;
use leptos::task::spawn_local;

use site_types::{UndatedPolicy, VisibilityDiff, format_year};

use crate::types::{FilterConfig, FilterState, SiteEntry, SliderMode, fetch_sites};
use crate::view::{DEFAULT_BOUNDS, SiteMapView};

const MAX_LISTED: usize = 500;

fn facet_checkboxes(
    title: &'static str,
    values: Vec<String>,
    filter: RwSignal<FilterState>,
    is_active: fn(&FilterState, &str) -> bool,
    toggle: fn(&mut FilterState, &str),
) -> impl IntoView {
    view! {
        <div class="facet-group">
            <span class="facet-title">{title}</span>
            {values.into_iter().map(|value| {
                let checked_value = value.clone();
                let toggle_value = value.clone();
                view! {
                    <label class="facet">
                        <input
                            type="checkbox"
                            prop:checked=move || filter.with(|f| is_active(f, &checked_value))
                            on:change=move |_| filter.update(|f| toggle(f, &toggle_value))
                        />
                        " " {value}
                    </label>
                }
            }).collect_view()}
        </div>
    }
}

fn site_item(entry: SiteEntry) -> impl IntoView {
    let group = entry.site.group.clone().unwrap_or_else(|| "-".to_string());
    let dates = entry.site.date_label();
    view! {
        <li class="site-item">
            <div class="site-meta">
                <span class="site-period">{entry.derived_period}</span>
                <span class="site-name">{entry.site.name}</span>
                <span class="site-group">{group}</span>
                {entry.site.site_type.map(|t| view! {
                    <span class="site-type">{t}</span>
                })}
                {dates.map(|d| view! {
                    <span class="site-dates">{d}</span>
                })}
            </div>
        </li>
    }
}

#[component]
pub fn SitesPage() -> impl IntoView {
    let data: RwSignal<Option<Result<SiteMapView, String>>> = RwSignal::new(None);
    let filter = RwSignal::new(FilterState::new(DEFAULT_BOUNDS.0, DEFAULT_BOUNDS.1));
    let config = RwSignal::new(FilterConfig::default());
    let extent = RwSignal::new(DEFAULT_BOUNDS);
    let last_change = RwSignal::new(VisibilityDiff::default());

    spawn_local(async move {
        match fetch_sites().await {
            Ok(sites) => {
                let map_view = SiteMapView::new(sites, config.get_untracked());
                let (lo, hi) = map_view.extent();
                data.set(Some(Ok(map_view)));
                extent.set((lo, hi));
                filter.set(FilterState::new(lo, hi));
            }
            Err(e) => data.set(Some(Err(e))),
        }
    });

    // Re-evaluate every marker whenever the sliders, checkboxes or mode change
    Effect::new(move |_| {
        let state = filter.get();
        let cfg = config.get();
        let mut diff = None;
        data.update(|d| {
            if let Some(Ok(map_view)) = d {
                diff = Some(map_view.apply(cfg, &state));
            }
        });
        if let Some(diff) = diff {
            last_change.set(diff);
        }
    });

    let cutoff = move || config.with(|c| c.slider_mode == SliderMode::Cutoff);

    view! {
        <div>
            <h2>"Historic sites"</h2>
            <p style="color:#7a6e5f;font-size:0.9rem;margin-bottom:0.75rem;">
                "Drag the sliders to pick a date window; tick periods or groups to narrow the list."
            </p>
            <div class="card">
                <div class="search-row">
                    <label class:disabled=cutoff>
                        "From "
                        <input
                            type="range"
                            step="1"
                            min=move || extent.get().0.to_string()
                            max=move || extent.get().1.to_string()
                            prop:value=move || filter.with(|f| f.min_year.to_string())
                            prop:disabled=cutoff
                            on:input=move |ev| {
                                if let Ok(v) = event_target_value(&ev).parse::<f64>() {
                                    filter.update(|f| {
                                        let max = f.max_year;
                                        f.set_range(v, max);
                                    });
                                }
                            }
                        />
                        <span class="year">{move || filter.with(|f| format_year(f.min_year))}</span>
                    </label>
                    <label>
                        {move || if cutoff() { "Built by " } else { "To " }}
                        <input
                            type="range"
                            step="1"
                            min=move || extent.get().0.to_string()
                            max=move || extent.get().1.to_string()
                            prop:value=move || filter.with(|f| f.max_year.to_string())
                            on:input=move |ev| {
                                if let Ok(v) = event_target_value(&ev).parse::<f64>() {
                                    let mode = config.with_untracked(|c| c.slider_mode);
                                    filter.update(|f| f.move_max_handle(mode, v));
                                }
                            }
                        />
                        <span class="year">{move || filter.with(|f| format_year(f.max_year))}</span>
                    </label>
                    <select
                        on:change=move |ev| {
                            let mode = if event_target_value(&ev) == "cutoff" {
                                SliderMode::Cutoff
                            } else {
                                SliderMode::Range
                            };
                            config.update(|c| c.slider_mode = mode);
                        }
                        style="max-width:140px;"
                    >
                        <option value="range">"Date range"</option>
                        <option value="cutoff">"Built by"</option>
                    </select>
                    <label>
                        <input
                            type="checkbox"
                            prop:checked=move || {
                                config.with(|c| c.treat_undated_as == UndatedPolicy::Visible)
                            }
                            on:change=move |ev| {
                                let policy = if event_target_checked(&ev) {
                                    UndatedPolicy::Visible
                                } else {
                                    UndatedPolicy::Hidden
                                };
                                config.update(|c| c.treat_undated_as = policy);
                            }
                        />
                        " Show undated"
                    </label>
                    <button type="button" on:click=move |_| filter.update(|f| f.clear_facets())
                        style="background:#aaa;">"Clear"</button>
                </div>
            </div>

            {move || match data.get() {
                None => view! { <p class="loading">"Loading sites…"</p> }.into_any(),
                Some(Err(e)) => view! { <p class="error">{e}</p> }.into_any(),
                Some(Ok(map_view)) => {
                    let count = map_view.visible_count();
                    let total = map_view.sites.len();
                    let change = last_change.get();
                    let listed: Vec<SiteEntry> = map_view
                        .visible_sites()
                        .take(MAX_LISTED)
                        .cloned()
                        .collect();
                    view! {
                        <div>
                            <div class="card facets">
                                {facet_checkboxes(
                                    "Period",
                                    map_view.periods(),
                                    filter,
                                    |f, v| f.active_periods.contains(v),
                                    |f, v| {
                                        f.toggle_period(v);
                                    },
                                )}
                                {facet_checkboxes(
                                    "Group",
                                    map_view.groups(),
                                    filter,
                                    |f, v| f.active_groups.contains(v),
                                    |f, v| {
                                        f.toggle_group(v);
                                    },
                                )}
                            </div>
                            <p style="color:#7a6e5f;font-size:0.88rem;margin-bottom:0.75rem;">
                                <strong>{count}</strong> " of " {total} " sites shown"
                                {(!change.is_empty()).then(|| view! {
                                    <span style="margin-left:0.75rem;">
                                        "(+" {change.shown.len()} " / −" {change.hidden.len()} ")"
                                    </span>
                                })}
                            </p>
                            {if count == 0 {
                                view! { <p class="empty">"No sites match the current filter."</p> }.into_any()
                            } else {
                                view! {
                                    <ul class="site-list">
                                        {listed.into_iter().map(site_item).collect_view()}
                                        {(count > MAX_LISTED).then(|| view! {
                                            <p style="color:#999;font-size:0.85rem;padding:0.5rem 0;">
                                                "(only the first " {MAX_LISTED} " are listed; narrow the filter)"
                                            </p>
                                        })}
                                    </ul>
                                }.into_any()
                            }}
                        </div>
                    }.into_any()
                }
            }}
        </div>
    }
}
