//! Client-side derivations behind the campground staff and seasonal rate
//! screens: shift conflict checks, schedule summaries, rate card pricing
//! previews and site map base image lookup.

pub mod rate_card;
pub mod site_map;
pub mod staff_shift;
