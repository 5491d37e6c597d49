// 領域層：與後端交換的資料模型與介面（ports）

pub mod model;
pub mod ports;
