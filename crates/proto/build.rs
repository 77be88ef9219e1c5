use std::env::var;
use std::io::Result;

fn main() -> Result<()> {
    let proto_files = &["proto/catalog/v1/catalog.proto"];
    let proto_folder = "proto";
    let out_dir = var("OUT_DIR").expect("Missing OUT_DIR environment variable");
    let descriptors_path = format!("{}/catalog_descriptor.bin", out_dir);

    println!("cargo:rerun-if-changed=proto/");

    tonic_prost_build::configure()
        .file_descriptor_set_path(descriptors_path)
        .protoc_arg("--experimental_allow_proto3_optional")
        .build_server(true)
        .build_client(true)
        .compile_protos(proto_files, &[proto_folder])?;

    Ok(())
}
