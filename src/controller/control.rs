//! Price controls: one value per fuel, displayed by any number of views.
use crate::fuel::{Fuel, PriceRange};
use crate::units::MoneyPerUnit;
use std::fmt;

/// A callback which displays a new value (e.g. a slider or a numeric input field)
pub type View<T> = Box<dyn FnMut(T)>;

/// A single source of truth for a value, with views which are notified whenever it changes
pub struct ValueCell<T: Copy> {
    value: T,
    views: Vec<View<T>>,
}

impl<T: Copy> ValueCell<T> {
    /// Create a cell with no views
    pub fn new(value: T) -> Self {
        Self {
            value,
            views: Vec::new(),
        }
    }

    /// The current value
    pub fn get(&self) -> T {
        self.value
    }

    /// Add a view. It is shown the current value straight away.
    pub fn subscribe(&mut self, mut view: View<T>) {
        view(self.value);
        self.views.push(view);
    }

    /// Change the value and update every view
    pub fn set(&mut self, value: T) {
        self.value = value;
        for view in &mut self.views {
            view(value);
        }
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for ValueCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueCell")
            .field("value", &self.value)
            .field("views", &self.views.len())
            .finish()
    }
}

/// The price control for one fuel.
///
/// The slider and the numeric field for a fuel are both views of the same cell, so they always
/// show the same price.
#[derive(Debug)]
pub struct PriceControl {
    fuel: Fuel,
    range: PriceRange,
    cell: ValueCell<MoneyPerUnit>,
}

impl PriceControl {
    /// Create a control showing the fuel's default price
    pub fn new(fuel: Fuel) -> Self {
        let range = fuel.price_range();
        Self {
            fuel,
            range,
            cell: ValueCell::new(range.default),
        }
    }

    /// The fuel this control sets the price for
    pub fn fuel(&self) -> Fuel {
        self.fuel
    }

    /// The valid range and step for the input widgets
    pub fn range(&self) -> PriceRange {
        self.range
    }

    /// The current price
    pub fn value(&self) -> MoneyPerUnit {
        self.cell.get()
    }

    /// Add a view of the price
    pub fn subscribe(&mut self, view: View<MoneyPerUnit>) {
        self.cell.subscribe(view);
    }

    /// Set the price, updating every view immediately
    pub fn set(&mut self, value: MoneyPerUnit) {
        self.cell.set(value);
    }

    /// Restore the default price
    pub fn reset(&mut self) {
        self.cell.set(self.range.default);
    }
}

/// Format a price the way the input widgets display it
pub fn format_price(value: MoneyPerUnit) -> String {
    format!("{:.2}", value.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// A view which records the text it was asked to display
    fn recording_view() -> (Rc<RefCell<Vec<String>>>, View<MoneyPerUnit>) {
        let shown = Rc::new(RefCell::new(Vec::new()));
        let view_shown = Rc::clone(&shown);
        let view: View<MoneyPerUnit> = Box::new(move |value: MoneyPerUnit| {
            view_shown.borrow_mut().push(format_price(value));
        });
        (shown, view)
    }

    #[test]
    fn test_value_cell_notifies_views() {
        let mut cell = ValueCell::new(1);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let view_seen = Rc::clone(&seen);
        cell.subscribe(Box::new(move |value: i32| view_seen.borrow_mut().push(value)));
        cell.set(2);
        cell.set(3);

        assert_eq!(cell.get(), 3);
        assert_eq!(*seen.borrow(), [1, 2, 3]);
    }

    #[test]
    fn test_paired_views_stay_in_sync() {
        let mut control = PriceControl::new(Fuel::HeatingOil);
        let (slider, slider_view) = recording_view();
        let (field, field_view) = recording_view();
        control.subscribe(slider_view);
        control.subscribe(field_view);

        control.set(MoneyPerUnit(3.5));
        assert_eq!(*slider.borrow(), ["4.40", "3.50"]);
        assert_eq!(*slider.borrow(), *field.borrow());

        control.reset();
        assert_eq!(control.value(), MoneyPerUnit(4.40));
        assert_eq!(slider.borrow().last().unwrap(), "4.40");
        assert_eq!(field.borrow().last().unwrap(), "4.40");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(MoneyPerUnit(425.0)), "425.00");
        assert_eq!(format_price(MoneyPerUnit(0.256)), "0.26");
    }
}
