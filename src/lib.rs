//! layout360 remaps 360° video frames between planar layouts through the unit sphere and
//! measures how much quality each remapping loses.
//!
//! The public API is layout-oriented:
//!
//! - Describe how the sphere is laid out on a picture with a [`LayoutView`]
//!   ([`FlatFixedLayout`], [`EquirectangularLayout`], [`CubeMapLayout`]), optionally wrapped
//!   in decorators ([`RotationDecorator`], [`OffsetDecorator`])
//! - Remap a [`Picture`] with [`LayoutViewExt::to_layout`] / [`LayoutViewExt::from_layout`]
//! - Score results with [`QualityMetric`] (PSNR, SSIM, MS-SSIM, S-PSNR, WS-PSNR)
//! - Drive whole videos from a JSON [`ConfigDocument`] with a [`FlowSession`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod config;
pub(crate) mod geometry;
pub(crate) mod layout;
pub(crate) mod media;
pub(crate) mod orientation;
pub(crate) mod picture;
pub(crate) mod session;

pub use crate::foundation::core::{Fps, FrameIndex, Resolution};
pub use crate::foundation::error::{LayoutError, LayoutResult};

pub use crate::geometry::coord::{Coord3dCart, Coord3dSpherical, CoordF, CoordI};
pub use crate::geometry::quaternion::{Quaternion, rotation};

pub use crate::picture::buffer::{CHANNELS, Picture, Pixel};
pub use crate::picture::interpolate::Interpolation;
pub use crate::picture::metric::QualityMetric;
pub use crate::picture::quality::PSNR_IDENTICAL_DB;
pub use crate::picture::spherical::{SPHERE_SAMPLE_COUNT, fibonacci_sphere};

pub use crate::orientation::dynamic_position::{DynamicPosition, PositionSample, PositionTrace};

pub use crate::layout::cubemap::{CUBE_FACES, CubeFace, CubeMapLayout};
pub use crate::layout::decorator::{
    DecoratorTransform, LayoutDecorator, OffsetDecorator, OffsetTransform, RotationDecorator,
    RotationTransform,
};
pub use crate::layout::equirectangular::EquirectangularLayout;
pub use crate::layout::flat_fixed::FlatFixedLayout;
pub use crate::layout::view::{LayoutBase, LayoutView, LayoutViewExt, NormalizedFaceInfo};

pub use crate::media::endpoint::LayoutEndpoint;
pub use crate::media::ffmpeg::{
    FfmpegSink, FfmpegSource, ProbeInfo, is_ffmpeg_on_path, is_ffprobe_on_path, probe_video,
};
pub use crate::media::image_seq::{ImageSequenceSink, ImageSequenceSource, is_image_file};
pub use crate::media::sink::{CapturedFrames, DEFAULT_CODEC, FrameSink, InMemorySink, SinkConfig};
pub use crate::media::source::{FrameSource, InMemorySource};

pub use crate::config::factory::LayoutFactory;
pub use crate::config::model::{
    ConfigDocument, DecoratorConfig, FlowSpec, GlobalConfig, LayoutConfig, LayoutKindConfig,
    RotationConfig,
};

pub use crate::session::flow::{FlowSession, RunStats, remap_picture};
pub use crate::session::quality_log::{CapturedReport, QualityLog};
