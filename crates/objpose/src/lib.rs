#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use objpose_tensor as tensor;

#[doc(inline)]
pub use objpose_image as image;

#[doc(inline)]
pub use objpose_imgproc as imgproc;

#[doc(inline)]
pub use objpose_io as io;

#[doc(inline)]
pub use objpose_3d as k3d;

#[doc(inline)]
pub use objpose_dnn as dnn;

#[doc(inline)]
pub use objpose_sim as sim;

#[doc(inline)]
pub use objpose_node as node;
