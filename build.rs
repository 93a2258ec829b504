fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Messages are declared by hand in `src/network/proto.rs`, so only the
    // service stubs are generated here and no protoc is needed.
    let agent_service = tonic_build::manual::Service::builder()
        .name("Agent")
        .package("cloud_agent")
        .method(
            tonic_build::manual::Method::builder()
                .name("gardener_shoots")
                .route_name("GardenerShoots")
                .input_type("crate::network::proto::ShootsRequest")
                .output_type("crate::network::proto::ShootsResponse")
                .codec_path("tonic::codec::ProstCodec")
                .build(),
        )
        .build();

    tonic_build::manual::Builder::new().compile(&[agent_service]);

    Ok(())
}
