use crate::core::geometry::{curved_connector, CurveOptions};
use crate::core::visualization::MapVisualizationState;
use crate::domain::model::{
    Bounds, ConnectorSpec, DomainLink, Entity, FitOptions, LngLat, MarkerHandle, MarkerIcon,
    MarkerSpec, RelationshipResult, RelationshipStats, Role,
};
use crate::domain::ports::MapSurface;
use serde::Serialize;
use std::fmt;

/// Colors, sizes and geometry used when drawing a result set.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStyle {
    pub center_color: String,
    pub related_color: String,
    pub center_size_px: u32,
    pub related_size_px: u32,
    pub connector_color: String,
    pub connector_width: f64,
    pub connector_opacity: f64,
    pub curve: CurveOptions,
    pub fit: FitOptions,
}

impl RenderStyle {
    /// Dot color for a marker, also used when its logo fails to load.
    pub fn marker_color(&self, is_center: bool) -> &str {
        if is_center {
            &self.center_color
        } else {
            &self.related_color
        }
    }
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            center_color: "#2563eb".to_string(),
            related_color: "#64748b".to_string(),
            center_size_px: 20,
            related_size_px: 15,
            connector_color: "#2563eb".to_string(),
            connector_width: 2.0,
            connector_opacity: 0.6,
            curve: CurveOptions::default(),
            fit: FitOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub name: String,
    pub logo: Option<String>,
    pub domain: Option<DomainLink>,
    /// `lat, lon` to four decimals.
    pub location: Option<String>,
}

impl Card {
    fn from_entity(entity: &Entity) -> Self {
        Self {
            name: entity.display_name().to_string(),
            logo: entity.logo().map(str::to_string),
            domain: entity.domain_link(),
            location: entity
                .position()
                .map(|p| format!("{:.4}, {:.4}", p.lat, p.lon)),
        }
    }
}

/// What the results list currently shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Panel {
    Blank,
    Empty {
        message: String,
    },
    Error {
        message: String,
    },
    Results {
        header: String,
        stats: RelationshipStats,
        cards: Vec<Card>,
    },
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Panel::Blank => Ok(()),
            Panel::Empty { message } => write!(f, "{}", message),
            Panel::Error { message } => write!(f, "Error: {}", message),
            Panel::Results {
                header,
                stats,
                cards,
            } => {
                writeln!(f, "{}", header)?;
                writeln!(
                    f,
                    "({} total, {} with location, {} with logo)",
                    stats.total, stats.with_location, stats.with_logo
                )?;
                for card in cards {
                    write!(f, "- {}", card.name)?;
                    if let Some(link) = &card.domain {
                        write!(f, " ({} <{}>)", link.label, link.href)?;
                    }
                    match &card.location {
                        Some(location) => writeln!(f, " | Location: {}", location)?,
                        None => writeln!(f, " | Location: Not available")?,
                    }
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapPanel {
    Ready,
    Unavailable { message: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub cards: usize,
    pub markers: usize,
    pub connectors: usize,
    /// Related entities left off the map for lack of coordinates.
    pub skipped: usize,
}

/// Draws one relationship result set at a time: the results list plus the
/// markers and connectors on the map.
pub struct RelationshipRenderer<M: MapSurface> {
    map: Option<M>,
    map_error: Option<String>,
    state: MapVisualizationState,
    panel: Panel,
    style: RenderStyle,
}

impl<M: MapSurface> RelationshipRenderer<M> {
    pub fn new(map: M, style: RenderStyle) -> Self {
        Self {
            map: Some(map),
            map_error: None,
            state: MapVisualizationState::new(),
            panel: Panel::Blank,
            style,
        }
    }

    /// Renderer whose map failed to initialize. Lists still render; the map
    /// panel keeps showing `reason` for the rest of the session.
    pub fn without_map(reason: impl Into<String>, style: RenderStyle) -> Self {
        Self {
            map: None,
            map_error: Some(reason.into()),
            state: MapVisualizationState::new(),
            panel: Panel::Blank,
            style,
        }
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn map_panel(&self) -> MapPanel {
        match &self.map_error {
            Some(message) => MapPanel::Unavailable {
                message: message.clone(),
            },
            None => MapPanel::Ready,
        }
    }

    pub fn map(&self) -> Option<&M> {
        self.map.as_ref()
    }

    pub fn state(&self) -> &MapVisualizationState {
        &self.state
    }

    /// Removes every marker and connector and blanks the list. Returns the
    /// number of map elements removed, so a second call returns 0.
    pub fn reset(&mut self) -> usize {
        self.panel = Panel::Blank;
        match self.map.as_mut() {
            Some(map) => self.state.teardown(map),
            None => 0,
        }
    }

    /// Replaces whatever is shown with an inline error.
    pub fn render_error(&mut self, message: impl Into<String>) {
        self.reset();
        self.panel = Panel::Error {
            message: message.into(),
        };
    }

    /// `role` is the role of `result.center`.
    pub fn render(&mut self, result: &RelationshipResult, role: Role) -> RenderSummary {
        let removed = self.reset();
        if removed > 0 {
            tracing::debug!("Cleared {} map elements from previous render", removed);
        }

        let related_role = role.counterpart();
        let center_name = result.center.display_name();
        let count = result.related.len();

        if count == 0 {
            self.panel = Panel::Empty {
                message: format!("No {} found for {}.", related_role.noun(0), center_name),
            };
            tracing::info!("No {} for {}", related_role.noun(0), center_name);
            return RenderSummary::default();
        }

        let header = match role {
            Role::ServiceProvider => format!(
                "{} serves {} {}",
                center_name,
                count,
                related_role.noun(count)
            ),
            Role::Client => format!(
                "{} works with {} {}",
                center_name,
                count,
                related_role.noun(count)
            ),
        };

        self.panel = Panel::Results {
            header,
            stats: result.stats(),
            cards: result.related.iter().map(Card::from_entity).collect(),
        };

        let mut summary = RenderSummary {
            cards: count,
            ..RenderSummary::default()
        };

        if let Some(map) = self.map.as_mut() {
            draw_result(map, &mut self.state, &self.style, result, &mut summary);
        }

        tracing::info!(
            "Rendered {} {} for {} ({} markers, {} connectors, {} without location)",
            count,
            related_role.noun(count),
            center_name,
            summary.markers,
            summary.connectors,
            summary.skipped
        );
        summary
    }

    /// Swaps a marker whose logo failed to load to the plain colored dot.
    pub fn on_logo_error(&mut self, handle: MarkerHandle) {
        if !self.state.contains_marker(handle) {
            return;
        }
        let is_center = self.state.center_marker() == Some(handle);
        let color = self.style.marker_color(is_center).to_string();
        if let Some(map) = self.map.as_mut() {
            tracing::debug!("Logo failed for marker {:?}, using fallback", handle);
            map.set_marker_icon(handle, MarkerIcon::Dot { color });
        }
    }
}

fn marker_spec(entity: &Entity, position: LngLat, is_center: bool, style: &RenderStyle) -> MarkerSpec {
    let icon = match entity.logo() {
        Some(url) => MarkerIcon::Logo {
            url: url.to_string(),
        },
        None => MarkerIcon::Dot {
            color: style.marker_color(is_center).to_string(),
        },
    };

    MarkerSpec {
        name: entity.display_name().to_string(),
        position,
        domain: entity.domain().map(str::to_string),
        is_center,
        size_px: if is_center {
            style.center_size_px
        } else {
            style.related_size_px
        },
        icon,
    }
}

fn draw_result<M: MapSurface>(
    map: &mut M,
    state: &mut MapVisualizationState,
    style: &RenderStyle,
    result: &RelationshipResult,
    summary: &mut RenderSummary,
) {
    let center = result.center.position();
    let mut placed = Vec::with_capacity(result.related.len() + 1);

    match center {
        Some(position) => {
            let handle = map.add_marker(marker_spec(&result.center, position, true, style));
            state.track_marker(handle, true);
            placed.push(position);
            summary.markers += 1;
        }
        None => tracing::debug!(
            "{} has no location, drawing related markers only",
            result.center.display_name()
        ),
    }

    for (index, entity) in result.related.iter().enumerate() {
        let Some(position) = entity.position() else {
            summary.skipped += 1;
            continue;
        };

        let handle = map.add_marker(marker_spec(entity, position, false, style));
        state.track_marker(handle, false);
        placed.push(position);
        summary.markers += 1;

        if let Some(start) = center {
            let id = format!("connection-{}", index);
            map.add_connector(ConnectorSpec {
                id: id.clone(),
                path: curved_connector(start, position, &style.curve),
                color: style.connector_color.clone(),
                width: style.connector_width,
                opacity: style.connector_opacity,
            });
            state.track_connector(id);
            summary.connectors += 1;
        }
    }

    if let Some(bounds) = Bounds::from_points(placed) {
        map.fit_bounds(bounds, &style.fit);
    }
}
