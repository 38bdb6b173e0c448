//! The built-in tile store drivers.
//!
//! | driver      | opens                                   | layers               | write |
//! |-------------|-----------------------------------------|----------------------|:-----:|
//! | `folder`    | an existing directory, png tiles        | sub-directories      | ✅    |
//! | `jpgfolder` | an existing directory, jpg tiles        | sub-directories      | ✅    |
//! | `gpkg`      | `*.gpkg`                                | tile matrix sets     | ❌    |
//! | `mbtiles`   | `*.mbtiles`                             | one, named by `name` | ✅    |
//! | `zxy`       | `http…/%d/%d/%d.png` URL templates      | one, the URL         | ❌    |

mod folder;
pub use folder::{TileFolder, TileFolderDriver, TileFolderSource};

mod gpkg;
pub use gpkg::{GeoPackageContents, GeoPackageDriver, GeoPackageLayer, GeoPackageSource, TileMatrixSet};

mod mbtiles;
pub use mbtiles::{MBTilesDriver, MBTilesMetadata, MBTilesSource, MBTilesStore};

mod zxy;
pub use zxy::{ZxyDriver, ZxyServer, ZxySource};

#[cfg(any(test, feature = "test"))]
mod mock;
#[cfg(any(test, feature = "test"))]
pub use mock::{MockTileSource, MockTileStore};
