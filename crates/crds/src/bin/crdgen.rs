//! Prints the HelmRelease CustomResourceDefinition as YAML.
//!
//! Usage: `cargo run -p crds --bin crdgen > config/crd/helmrelease.yaml`

use crds::HelmRelease;
use kube::CustomResourceExt;

fn main() -> anyhow::Result<()> {
    let crd = HelmRelease::crd();
    print!("{}", serde_yaml::to_string(&crd)?);
    Ok(())
}
