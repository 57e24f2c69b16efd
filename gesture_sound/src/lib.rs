//! # gesture_sound
//!
//! Hand gesture MIDI controller.  Hand landmarks come in (from a pose
//! estimator over a JSON-lines pipe, or from the mouse-driven simulator),
//! notes and controllers go out to a MIDI port, and a small window shows the
//! hands and the current controller values.
//!
//! ## Gesture → MIDI mapping (performance mode)
//!
//! | Gesture | Hand | MIDI |
//! |---|---|---|
//! | Straighten index / middle / ring / pinky | Right | Note on C4 / E4 / G4 / A4, louder when higher |
//! | Curl that finger | Right | Note off |
//! | Fist | Right | All finger notes off |
//! | Raise / lower wrist | Right | CC74 filter |
//! | One finger out, move it up / down | Left | CC22 aux mix |
//! | Open hand, move left / right | Left | Pitch bend |
//! | Spread hands apart | Both | CC91 reverb |
//!
//! In pulse mode every recognised gesture plays one short note instead.
//!
//! ## Simulation controls
//!
//! | Key | Action |
//! |---|---|
//! | mouse | Move the active hand |
//! | `1`–`7` | Open, fist, point, peace, pinky, pinch, combo |
//! | `Tab` | Switch active hand |
//! | `H` | Hide / show the active hand |
//! | `Esc` | Quit |

pub mod app;
pub mod output;
pub mod sim;
pub mod visualizer;
