// Board pipeline: ratio → canvas → required count → acquisition → layout.

pub mod composer;
pub mod handlers;
