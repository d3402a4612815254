use crate::BinmanContext;

/// Execute path command - print the managed directory
pub fn execute(ctx: &BinmanContext) {
    println!("{}", ctx.bin_dir().display());
}
