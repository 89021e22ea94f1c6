use clap::Parser;

use pixel_embed::{cli::EmbedArgs, handler::handle_embed};

/// 程序的主入口点
///
/// 负责解析命令行参数，并将执行交给嵌入处理函数
fn main() -> anyhow::Result<()> {
    let args = EmbedArgs::parse();

    handle_embed(args)?;
    Ok(())
}
