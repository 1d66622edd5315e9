use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, use_login_redirect, view_state_from_resource};
use crate::vm::{
    RecentClassVm, TodayStatsVm, format_date, map_recent_classes, map_today_stats,
};

#[derive(Clone, Debug, PartialEq)]
struct DashboardData {
    staff_name: String,
    today: TodayStatsVm,
    recent: Vec<RecentClassVm>,
}

#[component]
pub fn DashboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let auth = ctx.auth();
    let dashboard = ctx.dashboard();
    let today_str = format_date(ctx.clock().today());

    let mut resource = use_resource(move || {
        let auth = auth.clone();
        let dashboard = dashboard.clone();
        async move {
            let staff = auth.current_staff().await.map_err(ViewError::from)?;
            let today = dashboard
                .today_stats(&staff)
                .await
                .map_err(ViewError::from)?;
            let recent = dashboard
                .recent_classes(&staff)
                .await
                .map_err(ViewError::from)?;
            Ok::<_, ViewError>(DashboardData {
                staff_name: staff.name,
                today: map_today_stats(&today),
                recent: map_recent_classes(&recent),
            })
        }
    });

    use_login_redirect(resource);
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page dashboard",
            h2 { "Dashboard" }
            p { class: "page-sub", "{today_str}" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    p { class: "welcome", "Welcome back, {data.staff_name}" }
                    TodayStats { stats: data.today }
                    section { class: "quick-actions",
                        Link { class: "action", to: Route::Attendance {}, "Take Attendance" }
                        Link { class: "action", to: Route::Classes {}, "My Classes" }
                    }
                    h3 { "Recent Classes" }
                    if data.recent.is_empty() {
                        p { "No classes assigned yet." }
                    } else {
                        ul { class: "recent-classes",
                            for item in data.recent {
                                RecentClassRow { item }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        r#type: "button",
                        onclick: move |_| resource.restart(),
                        "Retry"
                    }
                },
            }
        }
    }
}

#[component]
fn TodayStats(stats: TodayStatsVm) -> Element {
    rsx! {
        section { class: "stat-cards",
            div { class: "stat-card stat-card--present",
                span { class: "stat-card__value", "{stats.present}" }
                span { class: "stat-card__label", "Present ({stats.present_pct}%)" }
            }
            div { class: "stat-card stat-card--absent",
                span { class: "stat-card__value", "{stats.absent}" }
                span { class: "stat-card__label", "Absent ({stats.absent_pct}%)" }
            }
            div { class: "stat-card stat-card--leave",
                span { class: "stat-card__value", "{stats.leave}" }
                span { class: "stat-card__label", "Leave ({stats.leave_pct}%)" }
            }
            div { class: "stat-card",
                span { class: "stat-card__value", "{stats.total}" }
                span { class: "stat-card__label", "Marked today" }
            }
        }
    }
}

#[component]
fn RecentClassRow(item: RecentClassVm) -> Element {
    rsx! {
        li { class: "recent-class",
            Link { to: Route::ClassDetail { class_id: item.class_id.to_string() },
                span { class: "recent-class__name", "{item.name}" }
                span { class: "recent-class__subject", "{item.subject}" }
            }
            span { class: "recent-class__date", "{item.date_str}" }
            span { class: "recent-class__count", "{item.present}/{item.total}" }
            span { class: "badge {item.band_class}", "{item.percentage}%" }
        }
    }
}
