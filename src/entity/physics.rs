//! Per-axis velocity integration and displacement quantization.

/// Integrates one velocity component for a frame.
///
/// With a non-zero `acceleration`, speeds under `min_speed` snap up to `min_speed` in the
/// acceleration's direction instead of integrating, and the result is clamped to
/// `±max_speed`. With zero acceleration the speed decays by `friction` per second and
/// becomes exactly zero once it falls under `min_speed`; the sign never flips.
pub fn integrate_axis(velocity: f32, acceleration: f32, dt: f32, min_speed: f32, max_speed: f32, friction: f32) -> f32 {
    if acceleration != 0.0 {
        let next = if velocity.abs() < min_speed {
            min_speed.copysign(acceleration)
        } else {
            velocity + acceleration * dt
        };
        next.clamp(-max_speed, max_speed)
    } else {
        let speed = velocity.abs() - friction * dt;
        if speed < min_speed || speed <= 0.0 {
            0.0
        } else {
            speed.copysign(velocity)
        }
    }
}

/// Products this close to a whole pixel count as that pixel.
const SNAP_EPSILON: f32 = 1e-4;

/// Converts a velocity into whole world pixels for this frame, carrying the fraction over.
///
/// Returns the pixel displacement and the new carry.
pub fn quantize(velocity: f32, dt: f32, zoom: f32, carry: f32) -> (i32, f32) {
    let exact = velocity * dt * zoom + carry;
    let nearest = exact.round();
    let whole = if (exact - nearest).abs() < SNAP_EPSILON {
        nearest
    } else {
        exact.trunc()
    };
    (whole as i32, exact - whole)
}
