//! The controller that turns user inputs into one render-ready projection.
//!
//! State is the tuple `(search_text, filter_spec, reference_point,
//! selected_id)`. Every committed change rebuilds the projection from the
//! catalog: search, then [`filter::apply`], then ranking when a reference
//! point is known. Nothing is patched incrementally.
//!
//! Search text is debounced. [`ViewStateController::set_search_text`] only
//! schedules the new text; the shell calls [`ViewStateController::poll`] from
//! its event loop (or [`ViewStateController::flush_search`] on submit) to
//! commit it.

use std::sync::Arc;
use std::time::Duration;

use crate::catalog::{ChargeableLocation, EntityCatalog};
use crate::debounce::{Clock, Debouncer, SystemClock, DEFAULT_SEARCH_DEBOUNCE};
use crate::filter::{self, FavoriteLookup, FilterSpec};
use crate::geo::Coordinates;
use crate::ranking::{self, RankedLocation};

/// Result count for the first, unfiltered nearest-sites view.
pub const INITIAL_NEAREST_LIMIT: usize = 10;

pub struct ViewStateController {
    catalog: Arc<EntityCatalog>,
    clock: Box<dyn Clock>,
    favorites: Option<Box<dyn FavoriteLookup>>,
    search: Debouncer<String>,
    search_text: String,
    filter_spec: FilterSpec,
    reference_point: Option<Coordinates>,
    selected_id: Option<String>,
    projection: Vec<RankedLocation>,
}

impl std::fmt::Debug for ViewStateController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewStateController")
            .field("catalog_len", &self.catalog.len())
            .field("search_text", &self.search_text)
            .field("search_pending", &self.search.is_pending())
            .field("filter_spec", &self.filter_spec)
            .field("reference_point", &self.reference_point)
            .field("selected_id", &self.selected_id)
            .field("projection_len", &self.projection.len())
            .field("has_favorites", &self.favorites.is_some())
            .finish_non_exhaustive()
    }
}

impl ViewStateController {
    /// A controller on the system clock with the default search debounce.
    #[must_use]
    pub fn new(catalog: Arc<EntityCatalog>) -> Self {
        Self::with_clock(catalog, Box::new(SystemClock), DEFAULT_SEARCH_DEBOUNCE)
    }

    #[must_use]
    pub fn with_clock(
        catalog: Arc<EntityCatalog>,
        clock: Box<dyn Clock>,
        search_debounce: Duration,
    ) -> Self {
        let mut controller = Self {
            catalog,
            clock,
            favorites: None,
            search: Debouncer::new(search_debounce),
            search_text: String::new(),
            filter_spec: FilterSpec::default(),
            reference_point: None,
            selected_id: None,
            projection: Vec::new(),
        };
        controller.recompute();
        controller
    }

    /// Attach the favorite-membership lookup and recompute.
    #[must_use]
    pub fn with_favorites(mut self, favorites: Box<dyn FavoriteLookup>) -> Self {
        self.set_favorites(Some(favorites));
        self
    }

    /// Replace the favorite-membership lookup. With none attached, a
    /// `favorites_only` filter admits nothing.
    pub fn set_favorites(&mut self, favorites: Option<Box<dyn FavoriteLookup>>) {
        self.favorites = favorites;
        self.recompute();
    }

    /// Schedule `text` to replace the search text once the debounce window
    /// passes. Supersedes any text still pending. The projection is unchanged
    /// until the text is committed.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        let now = self.clock.now();
        self.search.schedule(text.into(), now);
    }

    /// Commit pending search text whose window has elapsed. Returns whether
    /// the projection was rebuilt.
    pub fn poll(&mut self) -> bool {
        let now = self.clock.now();
        match self.search.take_due(now) {
            Some(text) => {
                self.commit_search(text);
                true
            }
            None => false,
        }
    }

    /// Commit pending search text immediately. Returns whether there was any.
    pub fn flush_search(&mut self) -> bool {
        match self.search.flush() {
            Some(text) => {
                self.commit_search(text);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn is_search_pending(&self) -> bool {
        self.search.is_pending()
    }

    pub fn set_filter_spec(&mut self, spec: FilterSpec) {
        self.filter_spec = spec;
        self.recompute();
    }

    /// `None` disables distance annotation and sorting.
    pub fn set_reference_point(&mut self, point: Option<Coordinates>) {
        self.reference_point = point;
        self.recompute();
    }

    /// Change the selection. Projection membership is not affected.
    pub fn select(&mut self, id: Option<String>) {
        self.selected_id = id;
    }

    /// Rebuild the projection, e.g. after the favorites behind the lookup
    /// changed.
    pub fn refresh(&mut self) {
        self.recompute();
    }

    #[must_use]
    pub fn projection(&self) -> &[RankedLocation] {
        &self.projection
    }

    #[must_use]
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    #[must_use]
    pub fn filter_spec(&self) -> &FilterSpec {
        &self.filter_spec
    }

    #[must_use]
    pub fn reference_point(&self) -> Option<Coordinates> {
        self.reference_point
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    /// The selected entity from the catalog, whether or not it is currently
    /// in the projection.
    #[must_use]
    pub fn selected(&self) -> Option<&Arc<ChargeableLocation>> {
        self.selected_id
            .as_deref()
            .and_then(|id| self.catalog.by_id(id))
    }

    /// False when nothing is selected or the selection is filtered out.
    #[must_use]
    pub fn is_selected_visible(&self) -> bool {
        self.selected_id
            .as_deref()
            .is_some_and(|id| self.projection.iter().any(|r| r.id() == id))
    }

    /// The first-load view: the `limit` sites nearest to `point` across the
    /// whole catalog, ignoring search and filters.
    #[must_use]
    pub fn initial_projection(&self, point: Coordinates, limit: usize) -> Vec<RankedLocation> {
        ranking::nearest_in(&self.catalog, point, limit)
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<EntityCatalog> {
        &self.catalog
    }

    fn commit_search(&mut self, text: String) {
        self.search_text = text;
        self.recompute();
    }

    fn recompute(&mut self) {
        let searched = filter::search(self.catalog.all(), &self.search_text);
        let filtered = filter::apply(&searched, &self.filter_spec, self.favorites.as_deref());

        self.projection = match self.reference_point {
            Some(point) => ranking::nearest(point, filtered.len(), &filtered),
            None => ranking::unranked(&filtered),
        };

        tracing::debug!(
            catalog = self.catalog.len(),
            searched = searched.len(),
            visible = self.projection.len(),
            ranked = self.reference_point.is_some(),
            "recomputed projection"
        );
    }
}

#[cfg(test)]
#[path = "view_state_test.rs"]
mod tests;
