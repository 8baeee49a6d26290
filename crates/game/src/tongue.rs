//! The tongue.
//!
//! A line from the actor's mouth that aims, shoots out toward a point and
//! sticks to it. Abilities use it for targeting: the grapple and swing
//! handlers raycast along its direction and the suction ability carries
//! whatever it catches at its tip.
//!
//! Extension and retraction are tweens advanced once per tick with an
//! ease-out-expo curve.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Values of `x` this close to 1 finish the curve exactly.
const EASE_SNAP: f32 = 1e-4;

/// What the tongue is doing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TongueMode {
    /// Follows the aim direction at its resting length.
    #[default]
    Aim,
    /// Moving its tip toward a target.
    Extending,
    /// Tip pinned to a point.
    Attached,
}

/// Fast start, long settle.
pub fn ease_out_expo(x: f32) -> f32 {
    if (x - 1.0).abs() < EASE_SNAP || x >= 1.0 {
        1.0
    } else {
        1.0 - 2f32.powf(-10.0 * x)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Tween {
    from: Vec3,
    to: Vec3,
    duration: f32,
    elapsed: f32,
}

impl Tween {
    fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    fn point(&self) -> Vec3 {
        self.from.lerp(self.to, ease_out_expo(self.progress()))
    }

    fn is_done(&self) -> bool {
        self.progress() >= 1.0
    }
}

/// Aiming and attachment helper carried by the actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tongue {
    mode: TongueMode,
    origin: Vec3,
    direction: Vec3,
    end_point: Vec3,
    length: f32,
    tween: Option<Tween>,
}

impl Tongue {
    /// A tongue at `origin` aiming right.
    pub fn new(origin: Vec3, length: f32) -> Self {
        Self {
            mode: TongueMode::Aim,
            origin,
            direction: Vec3::X,
            end_point: origin + Vec3::X * length,
            length,
            tween: None,
        }
    }

    #[inline]
    pub fn mode(&self) -> TongueMode {
        self.mode
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Unit aim direction in the movement plane.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    #[inline]
    pub fn end_point(&self) -> Vec3 {
        self.end_point
    }

    /// Where the tip rests while aiming.
    pub fn home(&self) -> Vec3 {
        self.origin + self.direction * self.length
    }

    /// Target of the running tween, if any.
    pub fn target(&self) -> Option<Vec3> {
        self.tween.map(|tween| tween.to)
    }

    /// The running tween has reached its target.
    pub fn is_settled(&self) -> bool {
        self.tween.map_or(true, |tween| tween.is_done())
    }

    pub fn is_tip_near(&self, point: Vec3, epsilon: f32) -> bool {
        self.end_point.distance(point) <= epsilon
    }

    /// Move the mouth. The resting tip follows while aiming.
    pub fn set_origin(&mut self, origin: Vec3) {
        self.origin = origin;
        if self.mode == TongueMode::Aim {
            self.end_point = self.home();
        }
    }

    /// Turn toward `aim_point`, flattened onto the movement plane.
    ///
    /// A point on top of the mouth keeps the previous direction.
    pub fn point_at(&mut self, aim_point: Vec3) {
        let mut offset = aim_point - self.origin;
        offset.z = 0.0;
        if let Some(direction) = offset.try_normalize() {
            self.direction = direction;
        }
        if self.mode == TongueMode::Aim {
            self.end_point = self.home();
        }
    }

    /// Drop whatever the tongue was doing and return to aiming.
    pub fn aim(&mut self) {
        self.mode = TongueMode::Aim;
        self.tween = None;
        self.end_point = self.home();
    }

    /// Shoot the tip out toward `target` over `duration` seconds.
    ///
    /// Only starts from [`TongueMode::Aim`]; returns whether it did.
    pub fn extend(&mut self, target: Vec3, duration: f32) -> bool {
        if self.mode != TongueMode::Aim {
            return false;
        }
        self.start_tween(target, duration);
        true
    }

    /// Pull the tip back toward `target` from wherever it is now.
    ///
    /// Only valid while extending or attached; returns whether it started.
    pub fn retract(&mut self, target: Vec3, duration: f32) -> bool {
        if self.mode == TongueMode::Aim {
            return false;
        }
        self.start_tween(target, duration);
        true
    }

    /// Pin the tip to `point`.
    pub fn attach(&mut self, point: Vec3) {
        self.mode = TongueMode::Attached;
        self.tween = None;
        self.end_point = point;
    }

    /// Advance the running tween.
    pub fn update(&mut self, delta_time: f32) {
        if let Some(tween) = self.tween.as_mut() {
            tween.elapsed += delta_time;
            self.end_point = tween.point();
        }
    }

    fn start_tween(&mut self, target: Vec3, duration: f32) {
        let tween = Tween {
            from: self.end_point,
            to: target,
            duration: duration.max(0.0),
            elapsed: 0.0,
        };
        self.mode = TongueMode::Extending;
        self.end_point = tween.point();
        self.tween = Some(tween);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_out_expo_endpoints() {
        assert_eq!(ease_out_expo(0.0), 0.0);
        assert_eq!(ease_out_expo(1.0), 1.0);
        assert!(ease_out_expo(0.5) > 0.95, "Most of the distance is covered early");
    }

    #[test]
    fn test_aim_flattens_direction() {
        let mut tongue = Tongue::new(Vec3::ZERO, 2.0);
        tongue.point_at(Vec3::new(0.0, 3.0, 5.0));

        assert!((tongue.direction() - Vec3::Y).length() < 1e-6);
        assert!((tongue.end_point() - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-6);

        // Degenerate aim keeps the last direction
        tongue.point_at(Vec3::new(0.0, 0.0, 4.0));
        assert!((tongue.direction() - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_extend_reaches_target() {
        let mut tongue = Tongue::new(Vec3::ZERO, 2.0);
        let target = Vec3::new(6.0, 0.0, 0.0);

        assert!(tongue.extend(target, 0.5));
        assert_eq!(tongue.mode(), TongueMode::Extending);
        assert!(!tongue.is_settled());

        for _ in 0..25 {
            tongue.update(0.02);
        }

        assert!(tongue.is_settled());
        assert!(tongue.is_tip_near(target, 1e-4), "tip={:?}", tongue.end_point());
    }

    #[test]
    fn test_extend_only_from_aim() {
        let mut tongue = Tongue::new(Vec3::ZERO, 2.0);
        tongue.attach(Vec3::new(3.0, 3.0, 0.0));

        assert!(!tongue.extend(Vec3::new(5.0, 0.0, 0.0), 1.0));
        assert_eq!(tongue.mode(), TongueMode::Attached);
    }

    #[test]
    fn test_retract_starts_from_current_tip() {
        let mut tongue = Tongue::new(Vec3::ZERO, 2.0);
        assert!(!tongue.retract(Vec3::ZERO, 1.0), "Nothing to retract while aiming");

        tongue.attach(Vec3::new(4.0, 0.0, 0.0));
        assert!(tongue.retract(tongue.home(), 0.4));
        assert_eq!(tongue.end_point(), Vec3::new(4.0, 0.0, 0.0));

        for _ in 0..20 {
            tongue.update(0.02);
        }
        assert!(tongue.is_tip_near(tongue.home(), 1e-4));

        tongue.aim();
        assert_eq!(tongue.mode(), TongueMode::Aim);
        assert!(tongue.target().is_none());
    }

    #[test]
    fn test_resting_tip_follows_origin() {
        let mut tongue = Tongue::new(Vec3::ZERO, 2.0);
        tongue.set_origin(Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(tongue.end_point(), Vec3::new(3.0, 1.0, 0.0));

        tongue.attach(Vec3::new(9.0, 9.0, 0.0));
        tongue.set_origin(Vec3::ZERO);
        assert_eq!(tongue.end_point(), Vec3::new(9.0, 9.0, 0.0), "Attached tip stays pinned");
    }
}
