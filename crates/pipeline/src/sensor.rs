//! Pointer activation.
//!
//! A press on a card does not start a drag right away: the pointer has to
//! travel at least the activation distance first. Releasing before that is
//! a click.

use hireboard_protocol::ApplicationId;

use crate::geometry::{Bounds, Point};

/// Default activation distance, in board units.
pub const DEFAULT_ACTIVATION_DISTANCE: f64 = 1.0;

/// A drag that passed the activation threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Activation {
    /// The card being dragged.
    pub application: ApplicationId,
    /// Where the press happened.
    pub origin: Point,
    /// The card's bounds at press time.
    pub card: Bounds,
    /// Where the pointer is now.
    pub pointer: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Press {
    application: ApplicationId,
    origin: Point,
    card: Bounds,
}

/// Tracks a single pointer from press to release.
///
/// # Examples
///
/// ```
/// use hireboard_pipeline::{Bounds, Point, PointerSensor};
/// use uuid::Uuid;
///
/// let card = Uuid::new_v4();
/// let mut sensor = PointerSensor::new(2.0);
/// sensor.press(card, Point::new(5.0, 5.0), Bounds::new(0.0, 4.0, 20.0, 3.0));
/// assert!(sensor.motion(Point::new(6.0, 5.0)).is_none());
/// assert!(sensor.motion(Point::new(7.0, 5.0)).is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PointerSensor {
    activation_distance: f64,
    pressed: Option<Press>,
}

impl Default for PointerSensor {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIVATION_DISTANCE)
    }
}

impl PointerSensor {
    /// Creates a sensor with the given activation distance.
    #[must_use]
    pub fn new(activation_distance: f64) -> Self {
        Self {
            activation_distance: activation_distance.max(0.0),
            pressed: None,
        }
    }

    /// Returns the activation distance.
    #[must_use]
    pub fn activation_distance(&self) -> f64 {
        self.activation_distance
    }

    /// Returns `true` between a press and its activation or release.
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.pressed.is_some()
    }

    /// Records a press on a card.
    pub fn press(&mut self, application: ApplicationId, origin: Point, card: Bounds) {
        self.pressed = Some(Press {
            application,
            origin,
            card,
        });
    }

    /// Reports pointer movement; returns an activation once the threshold
    /// is passed.
    pub fn motion(&mut self, pointer: Point) -> Option<Activation> {
        let press = self.pressed?;
        if press.origin.distance_to(pointer) < self.activation_distance {
            return None;
        }
        self.pressed = None;
        Some(Activation {
            application: press.application,
            origin: press.origin,
            card: press.card,
            pointer,
        })
    }

    /// Reports a release; returns the clicked card if no drag started.
    pub fn release(&mut self) -> Option<ApplicationId> {
        self.pressed.take().map(|p| p.application)
    }

    /// Forgets any press.
    pub fn reset(&mut self) {
        self.pressed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pressed(distance: f64) -> (PointerSensor, ApplicationId) {
        let id = ApplicationId::new_v4();
        let mut sensor = PointerSensor::new(distance);
        sensor.press(id, Point::new(10.0, 10.0), Bounds::new(8.0, 9.0, 20.0, 3.0));
        (sensor, id)
    }

    #[test]
    fn release_without_motion_is_click() {
        let (mut sensor, id) = pressed(1.0);
        assert_eq!(sensor.release(), Some(id));
        assert!(!sensor.is_pressed());
        assert_eq!(sensor.release(), None);
    }

    #[test]
    fn small_motion_is_still_click() {
        let (mut sensor, id) = pressed(3.0);
        assert!(sensor.motion(Point::new(11.0, 11.0)).is_none());
        assert_eq!(sensor.release(), Some(id));
    }

    #[test]
    fn threshold_activates_once() {
        let (mut sensor, id) = pressed(1.0);
        let activation = sensor.motion(Point::new(11.0, 10.0)).unwrap();
        assert_eq!(activation.application, id);
        assert_eq!(activation.origin, Point::new(10.0, 10.0));
        assert_eq!(activation.pointer, Point::new(11.0, 10.0));
        assert!(sensor.motion(Point::new(15.0, 10.0)).is_none());
        assert_eq!(sensor.release(), None);
    }

    #[test]
    fn reset_forgets_press() {
        let (mut sensor, _) = pressed(1.0);
        sensor.reset();
        assert!(sensor.motion(Point::new(30.0, 30.0)).is_none());
    }
}
