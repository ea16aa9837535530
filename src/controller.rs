//! The controller which keeps results in step with the user's fuel prices.
//!
//! Price edits update the displayed values immediately, but the (comparatively expensive) recompute
//! is debounced so that dragging a slider produces one recompute rather than dozens.
use crate::fuel::{Fuel, FuelPrices};
use crate::input::Dataset;
use crate::pipeline::{PipelineOutput, recompute};
use crate::units::MoneyPerUnit;
use anyhow::Result;
use indexmap::IndexMap;
use log::{debug, info};
use std::time::{Duration, Instant};
use strum::IntoEnumIterator;

pub mod control;
use control::{PriceControl, View};
pub mod debounce;
use debounce::Debouncer;

/// Receives complete results each time they are recalculated
pub trait Renderer {
    /// Display or store the results of a recompute
    fn render(&mut self, output: &PipelineOutput) -> Result<()>;
}

/// Owns the price configuration and dataset, and recomputes results when either changes
pub struct RecomputeController<R: Renderer> {
    dataset: Dataset,
    controls: IndexMap<Fuel, PriceControl>,
    prices: FuelPrices,
    debouncer: Debouncer,
    renderer: R,
    output: Option<PipelineOutput>,
}

impl<R: Renderer> RecomputeController<R> {
    /// Create a controller and run the first recompute.
    ///
    /// # Arguments
    ///
    /// * `dataset` - The tracts and their geometry
    /// * `prices` - Initial fuel prices
    /// * `debounce` - How long prices must be left alone before results are recalculated
    /// * `renderer` - Where to send results
    pub fn new(
        dataset: Dataset,
        prices: FuelPrices,
        debounce: Duration,
        renderer: R,
    ) -> Result<Self> {
        let controls = Fuel::iter()
            .map(|fuel| {
                let mut control = PriceControl::new(fuel);
                control.set(prices.get(fuel));
                (fuel, control)
            })
            .collect();

        let mut controller = Self {
            dataset,
            controls,
            prices,
            debouncer: Debouncer::new(debounce),
            renderer,
            output: None,
        };
        controller.recompute_now()?;

        Ok(controller)
    }

    /// Handle a new price from one of a fuel's input widgets.
    ///
    /// Every view of the price is updated straight away. The recompute is scheduled for when the
    /// debounce interval has elapsed without another edit. An invalid price is rejected and leaves
    /// the controller unchanged.
    pub fn on_price_input(&mut self, fuel: Fuel, value: MoneyPerUnit, now: Instant) -> Result<()> {
        self.prices = self.prices.with_price(fuel, value)?;
        self.control_mut(fuel).set(value);
        self.debouncer.schedule(now);
        debug!(
            "Price for {fuel} set to {value}; recomputing in {} ms unless changed again",
            self.debouncer.interval().as_millis()
        );

        Ok(())
    }

    /// Run the pending recompute if it is due.
    ///
    /// Returns `true` if a recompute was run. If it fails, the recompute is still owed and will be
    /// retried by the next call to `poll` or `flush`.
    pub fn poll(&mut self, now: Instant) -> Result<bool> {
        if !self.debouncer.is_due(now) {
            return Ok(false);
        }

        self.run_owed_recompute()?;
        Ok(true)
    }

    /// Run any pending recompute without waiting for it to become due.
    ///
    /// Returns `true` if a recompute was run. As with `poll`, a failed recompute is still owed.
    pub fn flush(&mut self) -> Result<bool> {
        if !self.debouncer.is_pending() {
            return Ok(false);
        }

        self.run_owed_recompute()?;
        Ok(true)
    }

    fn run_owed_recompute(&mut self) -> Result<()> {
        self.recompute_now()?;
        self.debouncer.cancel();

        Ok(())
    }

    /// Restore the default price for every fuel and recompute straight away
    pub fn reset(&mut self) -> Result<()> {
        info!("Resetting fuel prices to defaults");
        self.prices = FuelPrices::default();
        for control in self.controls.values_mut() {
            control.reset();
        }
        self.debouncer.cancel();
        self.recompute_now()
    }

    /// Replace the dataset and recompute straight away
    pub fn reload(&mut self, dataset: Dataset) -> Result<()> {
        info!("Reloading dataset ({} tracts)", dataset.records.len());
        self.dataset = dataset;
        self.debouncer.cancel();
        self.recompute_now()
    }

    /// Recalculate results with the current prices and dataset and pass them to the renderer
    pub fn recompute_now(&mut self) -> Result<()> {
        let output = recompute(
            &self.dataset.records,
            &self.dataset.geometry,
            &self.prices,
        );
        self.renderer.render(&output)?;
        self.output = Some(output);

        Ok(())
    }

    /// Add a view of a fuel's price (e.g. a slider or a numeric field)
    pub fn subscribe(&mut self, fuel: Fuel, view: View<MoneyPerUnit>) {
        self.control_mut(fuel).subscribe(view);
    }

    /// The current price configuration
    pub fn prices(&self) -> &FuelPrices {
        &self.prices
    }

    /// The price controls, one per fuel
    pub fn controls(&self) -> impl Iterator<Item = &PriceControl> {
        self.controls.values()
    }

    /// Whether a recompute is waiting for the debounce interval to elapse
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// The most recent results
    pub fn output(&self) -> Option<&PipelineOutput> {
        self.output.as_ref()
    }

    /// The renderer results are sent to
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Consume the controller, returning its renderer
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    fn control_mut(&mut self, fuel: Fuel) -> &mut PriceControl {
        self.controls
            .get_mut(&fuel)
            .expect("Controller should have a control for every fuel")
    }
}
