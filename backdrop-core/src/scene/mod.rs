//! Scene selection: weather classification, day/night resolution, media
//! lookup, the scene state machine and the manual override gate.

mod classifier;
mod daylight;
mod key;
mod manual;
mod resolver;
mod state;

pub use classifier::{classify, Classification};
pub use daylight::{parse_timestamp, parse_timestamp_str, resolve_night, SunTimes};
pub use key::SceneKey;
pub use manual::{ManualOverride, OverrideGate, OverrideRequest};
pub use resolver::{is_video_url, MediaType, SpriteInfo, SpriteResolver};
pub use state::{SceneMachine, SceneRequest, SceneState, Transition};
