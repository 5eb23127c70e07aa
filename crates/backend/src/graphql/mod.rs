use std::sync::Arc;

use async_graphql::{Context, Enum, InputObject, Json, Object, SimpleObject, ID};
use radar_shared::{
    models::{self, Anchor, RadarSession, Zone},
    zones, DataFault, RadarConfig, ViewState,
};

use crate::storage::Storage;

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
pub enum GqlZone {
    Near,
    Mid,
    Far,
}

impl From<Zone> for GqlZone {
    fn from(z: Zone) -> Self {
        match z {
            Zone::Near => GqlZone::Near,
            Zone::Mid => GqlZone::Mid,
            Zone::Far => GqlZone::Far,
        }
    }
}

// GraphQL output types

#[derive(SimpleObject)]
pub struct GqlRadarConfig {
    pub default_radius_km: f64,
    pub default_page_size: u32,
    pub page_size_options: Vec<u32>,
    pub slider_max_radius_km: f64,
    pub max_visible_pages: u32,
    pub distance_unit: String,
    pub center_x: f64,
    pub center_y: f64,
    pub max_plot_radius: f64,
}

impl From<&RadarConfig> for GqlRadarConfig {
    fn from(c: &RadarConfig) -> Self {
        GqlRadarConfig {
            default_radius_km: c.default_radius_km,
            default_page_size: c.default_page_size as u32,
            page_size_options: c.page_size_options.iter().map(|&s| s as u32).collect(),
            slider_max_radius_km: c.slider_max_radius_km,
            max_visible_pages: c.max_visible_pages as u32,
            distance_unit: c.distance_unit.clone(),
            center_x: c.geometry.center_x,
            center_y: c.geometry.center_y,
            max_plot_radius: c.geometry.max_radius,
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlRadarPoint {
    pub id: ID,
    pub name: String,
    pub distance: f64,
    pub distance_label: String,
    pub x: i32,
    pub y: i32,
    pub zone: GqlZone,
    pub color: String,
    pub color_style: String,
    /// Entity fields passed through from the nearby query.
    pub fields: Json<serde_json::Map<String, serde_json::Value>>,
}

impl From<models::RadarPoint> for GqlRadarPoint {
    fn from(p: models::RadarPoint) -> Self {
        GqlRadarPoint {
            id: ID(p.entity.id),
            name: p.entity.name,
            distance: p.distance,
            distance_label: p.distance_label,
            x: p.position.x,
            y: p.position.y,
            zone: p.zone.into(),
            color: p.color,
            color_style: p.color_style,
            fields: Json(p.entity.extra),
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlPageSizeOption {
    pub size: u32,
    pub selected: bool,
}

#[derive(SimpleObject)]
pub struct GqlRadarView {
    pub id: ID,
    pub anchor_id: String,
    pub anchor_name: String,
    pub points: Vec<GqlRadarPoint>,
    pub page_numbers: Vec<u32>,
    pub current_page: u32,
    pub page_size: u32,
    pub total_items: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
    pub summary: String,
    pub show_radar: bool,
    pub show_pagination: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub search_radius: f64,
    pub slider_value: f64,
    pub is_custom_radius: bool,
    pub page_size_options: Vec<GqlPageSizeOption>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&RadarSession> for GqlRadarView {
    fn from(s: &RadarSession) -> Self {
        let view = s.view.snapshot();
        GqlRadarView {
            id: ID(s.id.to_string()),
            anchor_id: s.anchor.id.clone(),
            anchor_name: s.anchor.name.clone(),
            points: view.visible_points.into_iter().map(GqlRadarPoint::from).collect(),
            page_numbers: view.page_numbers.into_iter().map(|n| n as u32).collect(),
            current_page: view.page.current_page as u32,
            page_size: view.page.page_size as u32,
            total_items: view.page.total_items as u32,
            total_pages: view.page.total_pages as u32,
            has_next: view.has_next,
            has_previous: view.has_previous,
            summary: view.summary,
            show_radar: view.show_radar,
            show_pagination: view.show_pagination,
            loading: view.loading,
            error: view.error,
            search_radius: view.search_radius,
            slider_value: view.slider_value,
            is_custom_radius: view.is_custom_radius,
            page_size_options: view
                .page_size_options
                .into_iter()
                .map(|o| GqlPageSizeOption {
                    size: o.size as u32,
                    selected: o.selected,
                })
                .collect(),
            created_at: s.created_at.clone(),
            updated_at: s.updated_at.clone(),
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlStats {
    pub total_sessions: u64,
    pub db_size_bytes: u64,
}

// Input types

#[derive(InputObject)]
pub struct AnchorInput {
    pub id: ID,
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(InputObject)]
pub struct OpenRadarInput {
    pub anchor: AnchorInput,
    pub radius_km: Option<f64>,
    pub page_size: Option<i32>,
    /// Ranked `{id, name, distance, ...}` records from the nearby query.
    pub entities: Option<Json<serde_json::Value>>,
}

/// Negative page numbers and sizes from clients map to zero, which the
/// paginator ignores (pages) or raises to one (sizes).
fn to_count(value: i32) -> usize {
    usize::try_from(value).unwrap_or(0)
}

/// Run `f` against the stored view and persist the result in one transaction.
fn update_session(
    storage: &Storage,
    id: &str,
    f: impl FnOnce(&mut ViewState),
) -> async_graphql::Result<GqlRadarView> {
    let session = storage
        .update_session(id, f)
        .map_err(async_graphql::Error::new)?
        .ok_or_else(|| async_graphql::Error::new("Radar session not found"))?;

    Ok(GqlRadarView::from(&session))
}

/// Decode the payload and hand it to the view as a finished load.
fn load_entities(view: &mut ViewState, payload: &serde_json::Value) {
    view.begin_load();
    let result = zones::entities_from_json(payload);
    view.finish_load(result, &mut rand::rng());
}

// Query root

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn radar_config(&self, ctx: &Context<'_>) -> GqlRadarConfig {
        let config = ctx.data::<Arc<RadarConfig>>().unwrap();
        GqlRadarConfig::from(config.as_ref())
    }

    async fn radar_view(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<Option<GqlRadarView>> {
        let storage = ctx.data::<Arc<Storage>>().unwrap();
        let session = storage.get_session(&id).map_err(async_graphql::Error::new)?;
        Ok(session.as_ref().map(GqlRadarView::from))
    }

    /// Place a list of entities on the radar without keeping a session.
    async fn map_preview(
        &self,
        ctx: &Context<'_>,
        entities: Json<serde_json::Value>,
        radius_km: Option<f64>,
    ) -> async_graphql::Result<Vec<GqlRadarPoint>> {
        let config = ctx.data::<Arc<RadarConfig>>().unwrap();
        let entities = zones::entities_from_json(&entities.0)
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        let points = zones::map_all(&entities, radius_km, config, &mut rand::rng());
        Ok(points.into_iter().map(GqlRadarPoint::from).collect())
    }

    async fn stats(&self, ctx: &Context<'_>) -> async_graphql::Result<GqlStats> {
        let storage = ctx.data::<Arc<Storage>>().unwrap();
        let total_sessions = storage.count_sessions().map_err(async_graphql::Error::new)?;
        let db_size_bytes = storage.db_size_bytes().map_err(async_graphql::Error::new)?;
        Ok(GqlStats {
            total_sessions,
            db_size_bytes,
        })
    }
}

// Mutation root

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Start a radar view for an anchor. An anchor without coordinates, or a
    /// payload that is not a list, yields a view carrying the error message.
    async fn open_radar(
        &self,
        ctx: &Context<'_>,
        input: OpenRadarInput,
    ) -> async_graphql::Result<GqlRadarView> {
        let storage = ctx.data::<Arc<Storage>>().unwrap();
        let config = ctx.data::<Arc<RadarConfig>>().unwrap();
        let now = chrono::Utc::now().to_rfc3339();

        let anchor = Anchor {
            id: input.anchor.id.0,
            name: input.anchor.name.unwrap_or_default(),
            latitude: input.anchor.latitude,
            longitude: input.anchor.longitude,
        };

        let mut view = ViewState::new(config.as_ref().clone());
        if let Some(radius) = input.radius_km {
            view.set_radius(radius, &mut rand::rng());
        }
        if let Some(size) = input.page_size {
            view.set_page_size(to_count(size));
        }

        match anchor.coordinates() {
            Ok((latitude, longitude)) => {
                tracing::debug!(anchor = %anchor.id, latitude, longitude, "Opening radar");
                let payload = input.entities.map(|j| j.0).unwrap_or_default();
                load_entities(&mut view, &payload);
            }
            Err(fault) => view.fail(fault),
        }

        let session = RadarSession {
            id: uuid::Uuid::new_v4(),
            anchor,
            view,
            created_at: now.clone(),
            updated_at: now,
        };

        storage
            .insert_session(&session)
            .map_err(async_graphql::Error::new)?;

        Ok(GqlRadarView::from(&session))
    }

    /// Record that the nearby query failed.
    async fn report_fault(
        &self,
        ctx: &Context<'_>,
        id: ID,
        message: String,
    ) -> async_graphql::Result<GqlRadarView> {
        let storage = ctx.data::<Arc<Storage>>().unwrap();
        update_session(storage, &id, |view| view.fail(DataFault::upstream(message)))
    }

    async fn replace_entities(
        &self,
        ctx: &Context<'_>,
        id: ID,
        entities: Json<serde_json::Value>,
    ) -> async_graphql::Result<GqlRadarView> {
        let storage = ctx.data::<Arc<Storage>>().unwrap();
        update_session(storage, &id, |view| load_entities(view, &entities.0))
    }

    async fn set_radius(
        &self,
        ctx: &Context<'_>,
        id: ID,
        radius_km: f64,
    ) -> async_graphql::Result<GqlRadarView> {
        let storage = ctx.data::<Arc<Storage>>().unwrap();
        update_session(storage, &id, |view| view.set_radius(radius_km, &mut rand::rng()))
    }

    async fn set_page_size(
        &self,
        ctx: &Context<'_>,
        id: ID,
        page_size: i32,
    ) -> async_graphql::Result<GqlRadarView> {
        let storage = ctx.data::<Arc<Storage>>().unwrap();
        update_session(storage, &id, |view| view.set_page_size(to_count(page_size)))
    }

    async fn go_next(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<GqlRadarView> {
        let storage = ctx.data::<Arc<Storage>>().unwrap();
        update_session(storage, &id, |view| view.go_next())
    }

    async fn go_previous(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<GqlRadarView> {
        let storage = ctx.data::<Arc<Storage>>().unwrap();
        update_session(storage, &id, |view| view.go_previous())
    }

    async fn go_to(
        &self,
        ctx: &Context<'_>,
        id: ID,
        page: i32,
    ) -> async_graphql::Result<GqlRadarView> {
        let storage = ctx.data::<Arc<Storage>>().unwrap();
        update_session(storage, &id, |view| view.go_to(to_count(page)))
    }

    async fn close_radar(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<bool> {
        let storage = ctx.data::<Arc<Storage>>().unwrap();
        storage.delete_session(&id).map_err(async_graphql::Error::new)
    }
}

pub type Schema = async_graphql::Schema<QueryRoot, MutationRoot, async_graphql::EmptySubscription>;

pub fn build_schema(config: Arc<RadarConfig>, storage: Arc<Storage>) -> Schema {
    async_graphql::Schema::build(QueryRoot, MutationRoot, async_graphql::EmptySubscription)
        .data(config)
        .data(storage)
        .finish()
}
