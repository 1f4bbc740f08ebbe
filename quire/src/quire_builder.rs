use crate::errors::QuireError;
use crate::errors::QuireResult;
use crate::quire::Quire;
use crate::quire_config::QuireConfig;
use crate::store::StoreFactory;

/// Builder for opening a [Quire] database.
///
/// Setters never fail on the spot. The first configuration error is kept
/// and returned by [open](QuireBuilder::open), and later setters are
/// ignored once an error is recorded.
///
/// # Examples
///
/// ```rust
/// use quire::quire::Quire;
///
/// let db = Quire::builder()
///     .id_allocation_attempts(4)
///     .open()
///     .unwrap();
/// assert!(!db.is_closed());
///
/// assert!(Quire::builder().id_allocation_attempts(0).open().is_err());
/// ```
#[derive(Default)]
pub struct QuireBuilder {
    error: Option<QuireError>,
    quire_config: QuireConfig,
}

impl QuireBuilder {
    /// Creates a builder with in-memory stores and default settings.
    pub fn new() -> Self {
        QuireBuilder {
            error: None,
            quire_config: QuireConfig::new(),
        }
    }

    /// Sets the factory that opens one partition per collection and one
    /// store per index.
    pub fn store_factory(mut self, store_factory: StoreFactory) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.quire_config.set_store_factory(store_factory) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Sets how many random identifiers an insert tries. Must be at least 1.
    pub fn id_allocation_attempts(mut self, attempts: u32) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.quire_config.set_id_allocation_attempts(attempts) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Freezes the configuration and opens the database.
    pub fn open(self) -> QuireResult<Quire> {
        if let Some(error) = self.error {
            return Err(error);
        }
        self.quire_config.freeze();
        Ok(Quire::new(self.quire_config))
    }
}
