//! Drill-down breadcrumb trail for the route screen

use egui::RichText;

use tm_core::{Action, GraphParams, LinkPayload, LinkTarget, SelectionKey};

use super::derive::RouteSelection;
use crate::ViewContext;

/// One rendered breadcrumb segment
#[derive(Debug, Clone, PartialEq)]
pub struct BreadcrumbSegment {
    /// Text shown to the user, prefix included
    pub label: String,

    /// Where clicking the segment navigates. None on the final
    /// segment, which is the current location and stays plain text.
    pub link: Option<LinkTarget>,

    /// Agency web page for this route, direction or stop
    pub external_url: Option<String>,
}

struct Candidate {
    key: SelectionKey,
    id: String,
    label: String,
    external_url: Option<String>,
}

/// Build the breadcrumb trail for the current selection.
///
/// Candidates follow the drill-down order route, direction, start stop,
/// end stop; a level whose record did not resolve is skipped entirely.
/// Selection keys accumulate across the remaining segments, so each
/// link carries every key up to and including its own level and
/// clicking it trims the selection back to that point. Stop segments
/// get a "from " or "to " prefix; stop ids come from the selection
/// rather than the stop record.
pub fn breadcrumb_segments(
    selection: &RouteSelection<'_>,
    params: &GraphParams,
) -> Vec<BreadcrumbSegment> {
    let mut candidates: Vec<Candidate> = Vec::new();

    if let Some(route) = selection.route {
        candidates.push(Candidate {
            key: SelectionKey::Route,
            id: route.id.clone(),
            label: route.title.clone(),
            external_url: route.url.clone(),
        });

        if let Some(direction) = selection.direction {
            candidates.push(Candidate {
                key: SelectionKey::Direction,
                id: direction.id.clone(),
                label: direction.title.clone(),
                external_url: direction.url.clone(),
            });
        }

        if let (Some(stop), Some(stop_id)) = (selection.start_stop, &params.start_stop_id) {
            candidates.push(Candidate {
                key: SelectionKey::StartStop,
                id: stop_id.clone(),
                label: format!("from {}", stop.title),
                external_url: stop.url.clone(),
            });
        }

        if let (Some(stop), Some(stop_id)) = (selection.end_stop, &params.end_stop_id) {
            candidates.push(Candidate {
                key: SelectionKey::EndStop,
                id: stop_id.clone(),
                label: format!("to {}", stop.title),
                external_url: stop.url.clone(),
            });
        }
    }

    let count = candidates.len();
    let mut payload = LinkPayload::default();
    candidates
        .into_iter()
        .enumerate()
        .map(|(index, candidate)| {
            payload.set(candidate.key, candidate.id);
            let is_last = index + 1 == count;
            BreadcrumbSegment {
                label: candidate.label,
                link: if is_last {
                    None
                } else {
                    Some(LinkTarget::route_screen(payload.clone()))
                },
                external_url: candidate.external_url,
            }
        })
        .collect()
}

/// Render the trail: agency root link, then one entry per segment
pub fn breadcrumb_bar(ctx: &ViewContext<'_>, ui: &mut egui::Ui, selection: &RouteSelection<'_>) {
    let segments = breadcrumb_segments(selection, &ctx.snapshot.graph_params);

    ui.horizontal(|ui| {
        if let Some(agency) = selection.agency {
            let root = RichText::new(agency.title).strong();
            if segments.is_empty() {
                ui.label(root);
            } else if ui.link(root).clicked() {
                ctx.dispatcher
                    .dispatch(Action::Navigate(LinkTarget::dashboard()));
            }
        }

        for segment in &segments {
            ui.weak("›");
            match &segment.link {
                Some(link) => {
                    if ui.link(&segment.label).clicked() {
                        ctx.dispatcher.dispatch(Action::Navigate(link.clone()));
                    }
                }
                None => {
                    ui.label(RichText::new(&segment.label).strong());
                }
            }
            if let Some(url) = &segment.external_url {
                ui.hyperlink_to("↗", url).on_hover_text(url);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tm_core::{Direction, Route, StopInfo, StoreSnapshot};

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
            url: Some("https://muni.example/routes/n".into()),
            directions: vec![Direction {
                id: "N_0".into(),
                title: "Inbound".into(),
                url: None,
                stop_ids: vec!["3212".into(), "5417".into()],
            }],
            stops,
        }
    }

    fn params(
        route: Option<&str>,
        direction: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> GraphParams {
        let mut params = GraphParams::for_agency("muni");
        params.route_id = route.map(String::from);
        params.direction_id = direction.map(String::from);
        params.start_stop_id = start.map(String::from);
        params.end_stop_id = end.map(String::from);
        params
    }

    fn segments_for(params: GraphParams) -> Vec<BreadcrumbSegment> {
        let snapshot = StoreSnapshot {
            graph_params: params,
            routes: Some(Arc::new(vec![n_judah()])),
            routes_generation: 1,
            routes_error: None,
            routes_loading: false,
            trip_metrics: None,
            trip_metrics_error: None,
            trip_metrics_loading: false,
        };
        let selection = RouteSelection::derive(&snapshot);
        breadcrumb_segments(&selection, &snapshot.graph_params)
    }

    fn labels(segments: &[BreadcrumbSegment]) -> Vec<&str> {
        segments.iter().map(|s| s.label.as_str()).collect()
    }

    fn payload_of(segment: &BreadcrumbSegment) -> &LinkPayload {
        &segment.link.as_ref().unwrap().payload
    }

    #[test]
    fn full_selection_reads_as_a_trail() {
        let segments = segments_for(params(
            Some("N"),
            Some("N_0"),
            Some("3212"),
            Some("5417"),
        ));
        assert_eq!(
            labels(&segments),
            vec![
                "N-Judah",
                "Inbound",
                "from Judah & La Playa",
                "to Duboce & Church"
            ]
        );
    }

    #[test]
    fn selection_without_end_stop_ends_at_the_start_stop() {
        let segments = segments_for(params(Some("N"), Some("N_0"), Some("3212"), None));
        assert_eq!(
            labels(&segments),
            vec!["N-Judah", "Inbound", "from Judah & La Playa"]
        );
        assert!(segments[0].link.is_some());
        assert!(segments[1].link.is_some());
        assert!(segments[2].link.is_none());
    }

    #[test]
    fn only_the_last_segment_is_plain_text() {
        let segments = segments_for(params(
            Some("N"),
            Some("N_0"),
            Some("3212"),
            Some("5417"),
        ));
        assert!(segments[0].link.is_some());
        assert!(segments[1].link.is_some());
        assert!(segments[2].link.is_some());
        assert!(segments[3].link.is_none());
    }

    #[test]
    fn links_accumulate_selection_keys_in_order() {
        let segments = segments_for(params(
            Some("N"),
            Some("N_0"),
            Some("3212"),
            Some("5417"),
        ));

        let first = payload_of(&segments[0]);
        assert_eq!(first.route_id.as_deref(), Some("N"));
        assert!(first.direction_id.is_none());

        let second = payload_of(&segments[1]);
        assert_eq!(second.route_id.as_deref(), Some("N"));
        assert_eq!(second.direction_id.as_deref(), Some("N_0"));
        assert!(second.start_stop_id.is_none());

        let third = payload_of(&segments[2]);
        assert_eq!(third.start_stop_id.as_deref(), Some("3212"));
        assert!(third.end_stop_id.is_none());
    }

    #[test]
    fn clicking_a_segment_trims_the_selection() {
        let current = params(Some("N"), Some("N_0"), Some("3212"), Some("5417"));
        let segments = segments_for(current.clone());

        let after = payload_of(&segments[1]).apply_to(&current);
        assert_eq!(after.direction_id.as_deref(), Some("N_0"));
        assert!(after.start_stop_id.is_none());
        assert!(after.end_stop_id.is_none());
    }

    #[test]
    fn without_a_direction_the_trail_ends_at_the_route() {
        // Stop ids left over in the params do not surface as segments
        // until a direction resolves them
        let segments = segments_for(params(Some("N"), None, Some("3212"), Some("5417")));
        assert_eq!(labels(&segments), vec!["N-Judah"]);
        assert!(segments[0].link.is_none());
    }

    #[test]
    fn unresolved_stop_id_is_filtered_out() {
        let segments = segments_for(params(Some("N"), Some("N_0"), Some("9999"), Some("5417")));
        assert_eq!(
            labels(&segments),
            vec!["N-Judah", "Inbound", "to Duboce & Church"]
        );
    }

    #[test]
    fn no_route_means_no_trail() {
        assert!(segments_for(params(None, None, None, None)).is_empty());
        // A selected but unknown route resolves to nothing as well
        assert!(segments_for(params(Some("J"), Some("N_0"), None, None)).is_empty());
    }

    #[test]
    fn route_url_shows_as_external_affordance() {
        let segments = segments_for(params(Some("N"), Some("N_0"), None, None));
        assert_eq!(
            segments[0].external_url.as_deref(),
            Some("https://muni.example/routes/n")
        );
        assert!(segments[1].external_url.is_none());
    }
}
