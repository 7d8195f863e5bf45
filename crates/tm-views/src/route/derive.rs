//! Values the route screen derives from the store each frame

use tracing::debug;

use tm_core::{get_agency, Action, Agency, Direction, Route, StopInfo, StoreSnapshot};

use crate::ViewContext;

/// The current selection resolved against fetched data.
///
/// Each field degrades to None when its inputs are missing: routes not
/// fetched yet, an id that matches nothing, or a selection that stops
/// at a shallower level. Deriving is cheap enough to redo every frame,
/// which keeps the screen consistent with the store by construction.
pub struct RouteSelection<'a> {
    /// Registry entry for the selected agency
    pub agency: Option<&'static Agency>,

    /// Route matching the selected route id
    pub route: Option<&'a Route>,

    /// Direction within the selected route
    pub direction: Option<&'a Direction>,

    /// Start stop record, resolved only while a direction is selected
    pub start_stop: Option<&'a StopInfo>,

    /// End stop record, resolved only while a direction is selected
    pub end_stop: Option<&'a StopInfo>,
}

impl<'a> RouteSelection<'a> {
    pub fn derive(snapshot: &'a StoreSnapshot) -> Self {
        let params = &snapshot.graph_params;
        let agency = params.agency_id.as_deref().and_then(get_agency);

        let route = match (
            snapshot.routes(),
            params.agency_id.as_deref(),
            params.route_id.as_deref(),
        ) {
            (Some(routes), Some(agency_id), Some(route_id)) => routes
                .iter()
                .find(|r| r.id == route_id && r.agency_id == agency_id),
            _ => None,
        };
        let direction = route
            .zip(params.direction_id.as_deref())
            .and_then(|(route, id)| route.direction(id));
        // Stop ids only mean something within a selected direction
        let start_stop = direction
            .and(route)
            .zip(params.start_stop_id.as_deref())
            .and_then(|(route, id)| route.stop(id));
        let end_stop = direction
            .and(route)
            .zip(params.end_stop_id.as_deref())
            .and_then(|(route, id)| route.stop(id));

        Self {
            agency,
            route,
            direction,
            start_stop,
            end_stop,
        }
    }
}

/// Identity key for the gated routes fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchDeps {
    pub agency_id: Option<String>,
    pub routes_generation: u64,
}

impl FetchDeps {
    pub fn of(snapshot: &StoreSnapshot) -> Self {
        Self {
            agency_id: snapshot.graph_params.agency_id.clone(),
            routes_generation: snapshot.routes_generation,
        }
    }
}

/// The screen's routes-fetch effect.
///
/// Runs once per frame. While the dependency key (agency id, routes
/// generation) is unchanged from `last`, nothing happens; when it
/// changes, a fetch fires only if routes are absent and an agency is
/// selected. A failed fetch leaves the key unchanged, so it does not
/// re-fire until the agency or the routes themselves change.
///
/// Returns the key to remember plus the action to dispatch, if any.
pub fn fetch_effect(
    snapshot: &StoreSnapshot,
    last: Option<&FetchDeps>,
) -> (FetchDeps, Option<Action>) {
    let deps = FetchDeps::of(snapshot);
    if Some(&deps) == last {
        return (deps, None);
    }

    let action = match (&deps.agency_id, snapshot.routes.is_some()) {
        (Some(agency_id), false) => Some(Action::FetchRoutes {
            agency_id: agency_id.clone(),
        }),
        _ => None,
    };
    (deps, action)
}

/// Run the effect against a view's cached key, dispatching whatever it
/// returns. Shared by every screen that needs routes loaded.
pub fn run_fetch_effect(ctx: &ViewContext<'_>, last: &mut Option<FetchDeps>) {
    let (deps, action) = fetch_effect(ctx.snapshot, last.as_ref());
    *last = Some(deps);
    if let Some(action) = action {
        debug!("routes fetch dependencies changed, dispatching");
        ctx.dispatcher.dispatch(action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tm_core::{GraphParams, StopInfo};

    fn n_judah() -> Route {
        let mut stops = indexmap::IndexMap::new();
        stops.insert(
            "3212".to_string(),
            StopInfo {
                id: "3212".into(),
                title: "Judah & La Playa".into(),
                url: None,
                lat: 37.76,
                lon: -122.508,
            },
        );
        stops.insert(
            "5417".to_string(),
            StopInfo {
                id: "5417".into(),
                title: "Duboce & Church".into(),
                url: None,
                lat: 37.769,
                lon: -122.429,
            },
        );
        Route {
            id: "N".into(),
            agency_id: "muni".into(),
            title: "N-Judah".into(),
            url: None,
            directions: vec![Direction {
                id: "N_0".into(),
                title: "Inbound".into(),
                url: None,
                stop_ids: vec!["3212".into(), "5417".into()],
            }],
            stops,
        }
    }

    fn snapshot(params: GraphParams, routes: Option<Vec<Route>>) -> StoreSnapshot {
        let generation = if routes.is_some() { 1 } else { 0 };
        StoreSnapshot {
            graph_params: params,
            routes: routes.map(Arc::new),
            routes_generation: generation,
            routes_error: None,
            routes_loading: false,
            trip_metrics: None,
            trip_metrics_error: None,
            trip_metrics_loading: false,
        }
    }

    fn full_params() -> GraphParams {
        let mut params = GraphParams::for_agency("muni");
        params.route_id = Some("N".into());
        params.direction_id = Some("N_0".into());
        params.start_stop_id = Some("3212".into());
        params.end_stop_id = Some("5417".into());
        params
    }

    #[test]
    fn derives_every_level_of_a_full_selection() {
        let snapshot = snapshot(full_params(), Some(vec![n_judah()]));
        let selection = RouteSelection::derive(&snapshot);

        assert_eq!(selection.agency.unwrap().id, "muni");
        assert_eq!(selection.route.unwrap().title, "N-Judah");
        assert_eq!(selection.direction.unwrap().title, "Inbound");
        assert_eq!(selection.start_stop.unwrap().title, "Judah & La Playa");
        assert_eq!(selection.end_stop.unwrap().title, "Duboce & Church");
    }

    #[test]
    fn everything_is_none_before_routes_arrive() {
        let snapshot = snapshot(full_params(), None);
        let selection = RouteSelection::derive(&snapshot);

        assert!(selection.agency.is_some());
        assert!(selection.route.is_none());
        assert!(selection.direction.is_none());
        assert!(selection.start_stop.is_none());
        assert!(selection.end_stop.is_none());
    }

    #[test]
    fn unknown_route_id_leaves_deeper_levels_unresolved() {
        let mut params = full_params();
        params.route_id = Some("J".into());
        let snapshot = snapshot(params, Some(vec![n_judah()]));
        let selection = RouteSelection::derive(&snapshot);

        assert!(selection.route.is_none());
        assert!(selection.direction.is_none());
        assert!(selection.start_stop.is_none());
    }

    #[test]
    fn stop_id_not_on_route_resolves_to_none() {
        let mut params = full_params();
        params.start_stop_id = Some("9999".into());
        let snapshot = snapshot(params, Some(vec![n_judah()]));
        let selection = RouteSelection::derive(&snapshot);

        assert!(selection.start_stop.is_none());
        assert!(selection.end_stop.is_some());
    }

    #[test]
    fn stops_stay_unresolved_until_a_direction_is_picked() {
        let mut params = full_params();
        params.direction_id = None;
        let snapshot = snapshot(params, Some(vec![n_judah()]));
        let selection = RouteSelection::derive(&snapshot);

        assert!(selection.route.is_some());
        assert!(selection.direction.is_none());
        assert!(selection.start_stop.is_none());
        assert!(selection.end_stop.is_none());
    }

    #[test]
    fn route_id_does_not_resolve_across_agencies() {
        let mut params = full_params();
        params.agency_id = Some("portland-sc".into());
        let snapshot = snapshot(params, Some(vec![n_judah()]));
        let selection = RouteSelection::derive(&snapshot);

        assert_eq!(selection.agency.unwrap().id, "portland-sc");
        assert!(selection.route.is_none());
        assert!(selection.direction.is_none());
    }

    #[test]
    fn effect_fires_once_while_routes_absent() {
        let snap = snapshot(GraphParams::for_agency("muni"), None);

        let (deps, action) = fetch_effect(&snap, None);
        assert_eq!(
            action,
            Some(Action::FetchRoutes {
                agency_id: "muni".into()
            })
        );

        // Same dependencies next frame: nothing fires
        let (deps, action) = fetch_effect(&snap, Some(&deps));
        assert_eq!(action, None);

        // Unrelated state moving is not a dependency change
        let mut busy = snap.clone();
        busy.trip_metrics_loading = true;
        let (_, action) = fetch_effect(&busy, Some(&deps));
        assert_eq!(action, None);
    }

    #[test]
    fn effect_does_not_fire_without_an_agency() {
        let snap = snapshot(GraphParams::default(), None);
        let (_, action) = fetch_effect(&snap, None);
        assert_eq!(action, None);
    }

    #[test]
    fn effect_does_not_fire_once_routes_are_present() {
        let snap = snapshot(GraphParams::for_agency("muni"), Some(vec![n_judah()]));
        let (_, action) = fetch_effect(&snap, None);
        assert_eq!(action, None);
    }

    #[test]
    fn failed_fetch_does_not_refire_until_dependencies_change() {
        let mut snap = snapshot(GraphParams::for_agency("muni"), None);
        let (deps, action) = fetch_effect(&snap, None);
        assert!(action.is_some());

        // Fetch failed: error is set but agency and generation are unchanged
        snap.routes_error = Some("connection refused".into());
        let (_, action) = fetch_effect(&snap, Some(&deps));
        assert_eq!(action, None);
    }

    #[test]
    fn effect_refires_after_agency_switch_clears_routes() {
        let snap = snapshot(GraphParams::for_agency("muni"), Some(vec![n_judah()]));
        let (deps, _) = fetch_effect(&snap, None);

        // Agency switch: routes cleared, generation bumped
        let mut switched = snapshot(GraphParams::for_agency("portland-sc"), None);
        switched.routes_generation = deps.routes_generation + 1;

        let (_, action) = fetch_effect(&switched, Some(&deps));
        assert_eq!(
            action,
            Some(Action::FetchRoutes {
                agency_id: "portland-sc".into()
            })
        );
    }

    #[test]
    fn routes_arrival_updates_the_key_without_firing() {
        let params = GraphParams::for_agency("muni");
        let absent = snapshot(params.clone(), None);
        let (deps, _) = fetch_effect(&absent, None);

        let arrived = snapshot(params, Some(vec![n_judah()]));
        let (new_deps, action) = fetch_effect(&arrived, Some(&deps));
        assert_eq!(action, None);
        assert_ne!(new_deps, deps);
    }
}
