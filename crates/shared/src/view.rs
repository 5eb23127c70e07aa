use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::RadarConfig;
use crate::error::DataFault;
use crate::models::{Entity, PageSizeOption, PageState, RadarPoint};
use crate::paging::Paginator;
use crate::zones;

/// Everything a renderer needs for one frame of the radar panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarView {
    pub visible_points: Vec<RadarPoint>,
    pub page_numbers: Vec<usize>,
    pub page: PageState,
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
    pub page_size_options: Vec<PageSizeOption>,
}

/// Owns the raw entity list, the search radius and the paged, mapped points.
///
/// Every input change goes through a method here; derived data is recomputed
/// at that point and readers only ever get owned copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    config: RadarConfig,
    entities: Vec<Entity>,
    search_radius: f64,
    points: Paginator<RadarPoint>,
    loading: bool,
    error: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::new(RadarConfig::default())
    }
}

impl ViewState {
    pub fn new(config: RadarConfig) -> Self {
        let search_radius = config.default_radius_km;
        let points = Paginator::new(Vec::new(), config.default_page_size);
        ViewState {
            config,
            entities: Vec::new(),
            search_radius,
            points,
            loading: false,
            error: None,
        }
    }

    pub fn config(&self) -> &RadarConfig {
        &self.config
    }

    pub fn search_radius(&self) -> f64 {
        self.search_radius
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Mark a fetch as in flight and clear any previous fault.
    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Apply the outcome of a fetch started with [`ViewState::begin_load`].
    pub fn finish_load<R: Rng>(&mut self, result: Result<Vec<Entity>, DataFault>, rng: &mut R) {
        match result {
            Ok(entities) => {
                self.loading = false;
                self.replace_entities(entities, rng);
            }
            Err(fault) => self.fail(fault),
        }
    }

    /// Record a fault. The current points are kept but not shown while the
    /// fault is present.
    pub fn fail(&mut self, fault: DataFault) {
        tracing::warn!(error = %fault, "Radar data fault");
        self.loading = false;
        self.error = Some(fault.to_string());
    }

    /// Take a new ranked list, map it and go back to the first page.
    pub fn replace_entities<R: Rng>(&mut self, entities: Vec<Entity>, rng: &mut R) {
        self.entities = entities;
        self.error = None;
        self.remap(rng);
    }

    /// Change the search radius and re-place every entity against it.
    /// A non-positive radius falls back to the configured default.
    pub fn set_radius<R: Rng>(&mut self, radius: f64, rng: &mut R) {
        self.search_radius = self.config.effective_radius(Some(radius));
        self.remap(rng);
    }

    fn remap<R: Rng>(&mut self, rng: &mut R) {
        let points = zones::map_all(&self.entities, Some(self.search_radius), &self.config, rng);
        tracing::debug!(
            entities = self.entities.len(),
            points = points.len(),
            radius = self.search_radius,
            "Recomputed radar points"
        );
        self.points.replace(points);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.points.set_page_size(page_size);
    }

    pub fn go_next(&mut self) {
        self.points.go_next();
    }

    pub fn go_previous(&mut self) {
        self.points.go_previous();
    }

    pub fn go_to(&mut self, page: usize) {
        self.points.go_to(page);
    }

    /// Every mapped point, in upstream order.
    pub fn all_points(&self) -> Vec<RadarPoint> {
        self.points.items().to_vec()
    }

    pub fn visible_points(&self) -> Vec<RadarPoint> {
        self.points.current_slice().to_vec()
    }

    pub fn page_numbers(&self) -> Vec<usize> {
        self.points.page_window(self.config.max_visible_pages)
    }

    pub fn page_state(&self) -> PageState {
        self.points.page_state()
    }

    pub fn has_next(&self) -> bool {
        self.points.has_next()
    }

    pub fn has_previous(&self) -> bool {
        self.points.has_previous()
    }

    pub fn summary_text(&self) -> String {
        self.points.summary_text()
    }

    pub fn is_active_page(&self, page: usize) -> bool {
        self.points.is_active_page(page)
    }

    pub fn show_pagination(&self) -> bool {
        self.points.show_pagination()
    }

    pub fn show_radar(&self) -> bool {
        !self.loading && self.error.is_none() && self.points.total_items() > 0
    }

    /// Radius as shown on the slider, which tops out at the configured max.
    pub fn slider_value(&self) -> f64 {
        self.search_radius.min(self.config.slider_max_radius_km)
    }

    /// Whether the radius was set beyond what the slider can show.
    pub fn is_custom_radius(&self) -> bool {
        self.search_radius > self.config.slider_max_radius_km
    }

    pub fn page_size_options(&self) -> Vec<PageSizeOption> {
        self.config
            .page_size_options
            .iter()
            .map(|&size| PageSizeOption {
                size,
                selected: size == self.points.page_size(),
            })
            .collect()
    }

    pub fn snapshot(&self) -> RadarView {
        RadarView {
            visible_points: self.visible_points(),
            page_numbers: self.page_numbers(),
            page: self.page_state(),
            has_next: self.has_next(),
            has_previous: self.has_previous(),
            summary: self.summary_text(),
            show_radar: self.show_radar(),
            show_pagination: self.show_pagination(),
            loading: self.loading,
            error: self.error.clone(),
            search_radius: self.search_radius,
            slider_value: self.slider_value(),
            is_custom_radius: self.is_custom_radius(),
            page_size_options: self.page_size_options(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Zone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(2024)
    }

    fn entities(n: usize) -> Vec<Entity> {
        (0..n)
            .map(|i| Entity::new(format!("acc-{}", i), format!("Farm {}", i), i as f64 * 0.5))
            .collect()
    }

    fn loaded(n: usize) -> ViewState {
        let mut view = ViewState::default();
        view.replace_entities(entities(n), &mut rng());
        view
    }

    #[test]
    fn test_new_view_is_empty() {
        let view = ViewState::default();
        assert!(view.visible_points().is_empty());
        assert_eq!(view.page_state().total_pages, 0);
        assert_eq!(view.summary_text(), "");
        assert!(view.page_numbers().is_empty());
        assert!(!view.show_radar());
        assert!((view.search_radius() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_twelve_entities_three_pages() {
        let mut view = loaded(12);
        assert_eq!(view.page_state().total_pages, 3);
        assert_eq!(view.page_numbers(), vec![1, 2, 3]);
        assert_eq!(view.visible_points().len(), 5);
        assert!(view.show_pagination());

        view.go_next();
        assert_eq!(view.page_numbers(), vec![1, 2, 3]);
        assert_eq!(view.visible_points()[0].entity.id, "acc-5");
        assert_eq!(view.summary_text(), "Showing 6-10 of 12 accounts");
    }

    #[test]
    fn test_visible_points_is_a_snapshot() {
        let mut view = loaded(12);
        let before = view.visible_points();
        assert_eq!(before, view.visible_points());
        view.go_next();
        assert_eq!(before[0].entity.id, "acc-0");
        assert_ne!(before, view.visible_points());
    }

    #[test]
    fn test_set_page_size_resets_to_first_page() {
        let mut view = loaded(60);
        view.go_to(4);
        assert_eq!(view.page_state().current_page, 4);
        view.set_page_size(10);
        assert_eq!(view.page_state().current_page, 1);
        assert_eq!(view.page_state().total_pages, 6);
        let selected: Vec<usize> = view
            .page_size_options()
            .into_iter()
            .filter(|o| o.selected)
            .map(|o| o.size)
            .collect();
        assert_eq!(selected, vec![10]);
    }

    #[test]
    fn test_replace_entities_resets_page() {
        let mut view = loaded(12);
        view.go_to(3);
        view.replace_entities(entities(7), &mut rng());
        assert_eq!(view.page_state().current_page, 1);
        assert_eq!(view.page_state().total_items, 7);
    }

    #[test]
    fn test_set_radius_remaps_and_resets() {
        let mut view = ViewState::default();
        view.replace_entities(vec![Entity::new("a", "A", 5.0)], &mut rng());
        assert_eq!(view.all_points()[0].zone, Zone::Mid);

        view.set_radius(20.0, &mut rng());
        assert_eq!(view.all_points()[0].zone, Zone::Near);
        assert_eq!(view.page_state().current_page, 1);

        view.set_radius(-1.0, &mut rng());
        assert!((view.search_radius() - 10.0).abs() < 1e-9);
        assert_eq!(view.all_points()[0].zone, Zone::Mid);
    }

    #[test]
    fn test_invalid_records_are_dropped() {
        let mut view = ViewState::default();
        view.replace_entities(
            vec![
                Entity::new("a", "A", 1.0),
                Entity::new("b", "B", "n/a"),
                Entity::new("c", "C", -2.0),
            ],
            &mut rng(),
        );
        assert_eq!(view.page_state().total_items, 1);
        assert_eq!(view.entities().len(), 3);
    }

    #[test]
    fn test_load_lifecycle_success() {
        let mut view = ViewState::default();
        view.begin_load();
        assert!(view.is_loading());
        assert!(!view.show_radar());
        view.finish_load(Ok(entities(3)), &mut rng());
        assert!(!view.is_loading());
        assert!(view.show_radar());
        assert_eq!(view.visible_points().len(), 3);
    }

    #[test]
    fn test_load_failure_hides_radar() {
        let mut view = loaded(3);
        view.begin_load();
        view.finish_load(Err(DataFault::upstream("timeout")), &mut rng());
        assert!(!view.is_loading());
        assert_eq!(view.error(), Some("Error loading nearby accounts: timeout"));
        assert!(!view.show_radar());

        let snapshot = view.snapshot();
        assert_eq!(snapshot.error.as_deref(), Some("Error loading nearby accounts: timeout"));
        assert!(!snapshot.show_radar);

        view.begin_load();
        assert!(view.error().is_none());
    }

    #[test]
    fn test_slider_value_and_custom_radius() {
        let mut view = ViewState::default();
        assert!(!view.is_custom_radius());
        view.set_radius(35.0, &mut rng());
        assert!((view.slider_value() - 20.0).abs() < 1e-9);
        assert!(view.is_custom_radius());
        view.set_radius(12.0, &mut rng());
        assert!((view.slider_value() - 12.0).abs() < 1e-9);
        assert!(!view.is_custom_radius());
    }

    #[test]
    fn test_snapshot_matches_accessors() {
        let mut view = loaded(12);
        view.go_to(2);
        let snap = view.snapshot();
        assert_eq!(snap.visible_points, view.visible_points());
        assert_eq!(snap.page_numbers, vec![1, 2, 3]);
        assert!(snap.has_next);
        assert!(snap.has_previous);
        assert_eq!(snap.summary, "Showing 6-10 of 12 accounts");
        assert_eq!(snap.page_size_options.len(), 4);
        assert!(view.is_active_page(2));
    }

    #[test]
    fn test_view_state_survives_json() {
        let mut view = loaded(12);
        view.go_next();
        let json = serde_json::to_string(&view).unwrap();
        let restored: ViewState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.page_state(), view.page_state());
        assert_eq!(restored.visible_points(), view.visible_points());
    }
}
