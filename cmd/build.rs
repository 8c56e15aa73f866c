use buildversion::emit::Emitter;

fn main() -> std::io::Result<()> {
    println!("cargo:rerun-if-changed=build.rs");
    Emitter::new().warnings(true).emit()
}
