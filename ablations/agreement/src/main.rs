//! 正弦图法与 Hough 直线检测法的一致性消融实验.
//!
//! 在一组旋转的合成椭圆体模上分别运行两种角度投影方法, 统计耗时以及相对解析值和 EED 的偏差.

mod profile;
mod result;
mod runner;

fn main() {
    simple_logger::init_with_level(log::Level::Info).expect("Logger initialization error");
    runner::run().analyze();
}
