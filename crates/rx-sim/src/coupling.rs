//! Reactor → tank heat exchange.

use rx_core::Real;

/// Heat moved from the reactor into the tank during one step.
///
/// Driving force is the reactor's excess over the tank (`max(h_r - h_t, 0)`),
/// capped by the water present so a near-empty tank absorbs almost nothing.
/// The result never exceeds half the excess, so a single step cannot push
/// the tank past the reactor.
pub fn heat_transfer(
    reactor_heat: Real,
    tank_heat: Real,
    tank_water: Real,
    coupling_rate: Real,
    dt: Real,
) -> Real {
    let excess = (reactor_heat - tank_heat).max(0.0);
    if excess == 0.0 || tank_water <= 0.0 || dt <= 0.0 {
        return 0.0;
    }
    let driven = coupling_rate * excess.min(tank_water) * dt;
    if driven.is_nan() {
        return 0.0;
    }
    driven.min(0.5 * excess)
}
