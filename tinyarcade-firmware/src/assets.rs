//! Raw RGB565 images compiled into the firmware
//!
//! Every `.raw` file under `assets/` is embedded by build.rs and looked up
//! by its path relative to that directory (`image.raw`,
//! `icons/icon_1.raw`). Names with no file render a placeholder.

include!(concat!(env!("OUT_DIR"), "/assets.rs"));
