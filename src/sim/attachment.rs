//! Attachment tracker
//!
//! While dragging, the point grabbed on the object is pinned under the
//! pointer, like an invisible rod between the finger and the object.
//! No velocity is tracked here; the release velocity comes from the
//! gesture source.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::TossableObject;

/// Transient state for one active drag gesture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragSession {
    /// Grabbed point relative to the object center, in object-local space
    pub anchor_offset: Vec2,
    /// Pointer position the grabbed point is bound to
    pub anchor_point: Vec2,
}

impl DragSession {
    /// Grab the object at `pointer`
    pub fn begin(pointer: Vec2, object: &TossableObject) -> Self {
        Self {
            anchor_offset: object.to_local(pointer),
            anchor_point: pointer,
        }
    }

    /// Move the anchor to `pointer` and drag the object along with it
    pub fn update(&mut self, pointer: Vec2, object: &mut TossableObject) {
        self.anchor_point = pointer;
        self.apply(object);
    }

    /// Place the object so the grabbed point sits on the anchor, keeping
    /// its rotation
    pub fn apply(&self, object: &mut TossableObject) {
        let offset = object.to_screen(self.anchor_offset) - object.pose.center;
        object.pose.center = self.anchor_point - offset;
    }

    /// Where the grabbed point currently is on screen
    pub fn attached_point(&self, object: &TossableObject) -> Vec2 {
        object.to_screen(self.anchor_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Pose;
    use std::f32::consts::FRAC_PI_2;

    fn object_at(x: f32, y: f32) -> TossableObject {
        TossableObject::new(Pose::new(Vec2::new(x, y), Vec2::splat(50.0)))
    }

    #[test]
    fn test_begin_records_offset_from_center() {
        let object = object_at(100.0, 100.0);
        let session = DragSession::begin(Vec2::new(110.0, 110.0), &object);
        assert_eq!(session.anchor_offset, Vec2::new(10.0, 10.0));
        assert_eq!(session.anchor_point, Vec2::new(110.0, 110.0));
    }

    #[test]
    fn test_update_keeps_grabbed_point_under_pointer() {
        let mut object = object_at(100.0, 100.0);
        let mut session = DragSession::begin(Vec2::new(110.0, 110.0), &object);

        session.update(Vec2::new(200.0, 150.0), &mut object);
        assert_eq!(object.pose.center, Vec2::new(190.0, 140.0));
        assert_eq!(object.pose.rotation, 0.0);
        assert!((session.attached_point(&object) - session.anchor_point).length() < 1e-4);
    }

    #[test]
    fn test_update_respects_rotation() {
        let mut object = object_at(0.0, 0.0);
        object.pose.rotation = FRAC_PI_2;
        let mut session = DragSession::begin(Vec2::new(0.0, 10.0), &object);

        session.update(Vec2::new(50.0, 50.0), &mut object);
        assert!((object.pose.center - Vec2::new(50.0, 40.0)).length() < 1e-4);
        assert_eq!(object.pose.rotation, FRAC_PI_2);
    }

    #[test]
    fn test_update_does_not_touch_velocity() {
        let mut object = object_at(0.0, 0.0);
        let mut session = DragSession::begin(Vec2::ZERO, &object);
        session.update(Vec2::new(300.0, -20.0), &mut object);
        assert_eq!(object.vel, Vec2::ZERO);
    }
}
