//! Flatpak packaging descriptors.
//!
//! Both files live in the flatpak directory and are named after the
//! application id: `{unique_name}.metainfo.xml` and `{unique_name}.desktop`.

mod desktop;
mod metainfo;

pub use desktop::{desktop_entry, write_desktop_file};
pub use metainfo::{rewrite_metainfo, update_metainfo};
