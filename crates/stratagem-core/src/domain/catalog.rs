//! Stock stratagem catalogue shipped with the application.
//!
//! Plugins and profiles may add to or shadow these entries; that merging
//! happens outside the engine.

use super::direction::Direction;
use Direction::{Down as D, Left as L, Right as R, Up as U};

/// `(name, sequence)` pairs grouped by the in-game department that issues them.
pub(crate) const BUILTIN: &[(&str, &[Direction])] = &[
    // ── Patriotic Administration Center ──
    ("Machine Gun", &[D, L, D, U, R]),
    ("Anti-Materiel Rifle", &[D, L, R, U, D]),
    ("Stalwart", &[D, L, D, U, U, L]),
    ("Expendable Anti-Tank", &[D, D, L, U, R]),
    ("Recoilless Rifle", &[D, L, R, R, L]),
    ("Flamethrower", &[D, L, U, D, U]),
    ("Autocannon", &[D, L, D, U, U, R]),
    ("Heavy Machine Gun", &[D, L, U, D, D]),
    ("Airburst Rocket Launcher", &[D, U, U, L, R]),
    ("Commando", &[D, L, U, D, R]),
    ("Railgun", &[D, R, L, D, U, L, R]),
    ("Spear", &[D, D, U, D, D]),
    ("Sterilizer", &[D, L, U, D, L]),
    // ── Orbital Cannons ──
    ("Orbital Gatling Barrage", &[R, D, L, U, U]),
    ("Orbital Airburst Strike", &[R, R, R]),
    ("Orbital 120MM HE Barrage", &[R, R, D, L, R, D]),
    ("Orbital 380MM HE Barrage", &[R, D, U, U, L, D, D]),
    ("Orbital Walking Barrage", &[R, D, R, D, R, D]),
    ("Orbital Laser", &[R, D, U, R, D]),
    ("Orbital Railcannon Strike", &[R, U, D, D, R]),
    ("Orbital Napalm Barrage", &[R, R, D, L, U, U]),
    // ── Hangar ──
    ("Eagle Strafing Run", &[U, R, R]),
    ("Eagle Airstrike", &[U, R, D, R]),
    ("Eagle Cluster Bomb", &[U, R, D, D, R]),
    ("Eagle Napalm Airstrike", &[U, R, D, U]),
    ("Jump Pack", &[D, U, U, D, U]),
    ("Eagle Smoke Strike", &[U, R, U, D]),
    ("Eagle 110MM Rocket Pods", &[U, R, U, L]),
    ("Eagle 500KG Bomb", &[U, R, D, D, D]),
    ("Eagle Rearm", &[U, U, L, U, R]),
    // ── Bridge ──
    ("Orbital Precision Strike", &[R, R, U]),
    ("Orbital Gas Strike", &[R, R, D, R]),
    ("Orbital EMS Strike", &[R, R, L, D]),
    ("Orbital Smoke Strike", &[R, R, D, U]),
    ("HMG Emplacement", &[D, U, L, R, R, L]),
    ("Shield Generator Relay", &[D, D, L, R, L, R]),
    ("Tesla Tower", &[D, U, R, U, L, R]),
    // ── Engineering Bay ──
    ("Anti-Personnel Minefield", &[D, L, U, R]),
    ("Supply Pack", &[D, L, D, U, U, D]),
    ("Grenade Launcher", &[D, L, U, L, D]),
    ("Laser Cannon", &[D, L, D, U, L]),
    ("Incendiary Mines", &[D, L, L, D]),
    ("Guard Dog Rover", &[D, U, L, U, R, R]),
    ("Ballistic Shield Backpack", &[D, L, D, D, U, L]),
    ("Arc Thrower", &[D, R, D, U, L, L]),
    ("Quasar Cannon", &[D, D, U, L, R]),
    ("Shield Generator Pack", &[D, U, L, R, L, R]),
    ("Anti-Tank Mines", &[D, L, U, U]),
    ("Gas Mines", &[D, L, L, D]),
    // ── Robotics Workshop ──
    ("Machine Gun Sentry", &[D, U, R, R, U]),
    ("Gatling Sentry", &[D, U, R, L]),
    ("Mortar Sentry", &[D, U, R, R, D]),
    ("Guard Dog", &[D, U, L, U, R, D]),
    ("Autocannon Sentry", &[D, U, R, U, L, U]),
    ("Rocket Sentry", &[D, U, R, R, L]),
    ("EMS Mortar Sentry", &[D, U, R, D, R]),
    ("Patriot Exosuit", &[L, D, R, U, L, D, D]),
    ("Emancipator Exosuit", &[L, D, R, U, L, D, U]),
    ("Guard Dog Dog Breath", &[D, U, L, U, R, U]),
    // ── Mission Specific ──
    ("Reinforce", &[U, D, R, L, U]),
    ("SOS Beacon", &[U, D, R, U]),
    ("Resupply", &[D, D, U, R]),
    ("Hellbomb", &[D, U, L, D, U, R, D, U]),
    ("Upload Data", &[L, R, U, U, U]),
    ("Seismic Probe", &[U, U, L, R, D, D]),
    ("SSSD Delivery", &[D, D, D, U, U]),
    ("SEAF Artillery", &[R, U, U, D]),
    ("Super Earth Flag", &[D, U, D, U]),
    ("Illumination Flare", &[R, R, L, L]),
];
