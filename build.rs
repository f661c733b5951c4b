fn main() -> Result<(), Box<dyn std::error::Error>> {
    prost_build::compile_protos(&["proto/extra_actions_base.proto"], &["proto"])?;
    Ok(())
}
