mod surface;

pub use surface::PageSurface;
