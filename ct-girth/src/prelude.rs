//! 🍇欢迎光临🍓
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::{Idx2d, Idx2dF, Idx3d};

pub use crate::{CtSeries, Extent, MaskSlice, ScanSlice, VoxelSpacing};

pub use crate::{DiameterError, DiameterResult, ErrorKind};

pub use crate::diameter::{equivalent_diameter, slice_equivalent_diameter, EquivalentDiameterData};

pub use crate::projection::{
    AngleSweep, AngularProjection, HoughProjector, ProjectionMethod, RadonProjector, SinogramData,
};

pub use crate::volume::{
    calculate_area_equivalent_diameter, DiameterConfig, DiameterPipeline, SliceDiameters,
    VolumeDiameters,
};

pub use crate::ssde::ReferencePhantom;
