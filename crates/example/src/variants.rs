//! The resource variants the example deploys.

use ambients_system::catalog::{Catalog, VariantSchema};
use ambients_system::resource::ResourceKind;

/// `azure-nextgen:resources/latest:ResourceGroup`.
pub static RESOURCE_GROUP: VariantSchema = VariantSchema::new(
    "ResourceGroupArgs",
    "azure-nextgen:resources/latest:ResourceGroup",
    &["resourceGroupName", "location", "tags"],
)
.with_kind(ResourceKind::ResourceGroup);

/// `azure-nextgen:storage/latest:StorageAccount`.
pub static STORAGE_ACCOUNT: VariantSchema = VariantSchema::new(
    "StorageAccountArgs",
    "azure-nextgen:storage/latest:StorageAccount",
    &["accountName", "resourceGroupName", "location", "kind", "sku"],
);

/// `azure-nextgen:storage/latest:BlobContainer`.
pub static BLOB_CONTAINER: VariantSchema = VariantSchema::new(
    "BlobContainerArgs",
    "azure-nextgen:storage/latest:BlobContainer",
    &["accountName", "containerName", "resourceGroupName", "publicAccess"],
);

/// `azure-nextgen:web/latest:AppServicePlan`.
pub static APP_SERVICE_PLAN: VariantSchema = VariantSchema::new(
    "AppServicePlanArgs",
    "azure-nextgen:web/latest:AppServicePlan",
    &["name", "resourceGroupName", "location", "kind", "sku"],
);

/// `azure-nextgen:web/latest:WebApp`.
pub static WEB_APP: VariantSchema = VariantSchema::new(
    "WebAppArgs",
    "azure-nextgen:web/latest:WebApp",
    &["name", "resourceGroupName", "location", "serverFarmId", "siteConfig"],
);

/// Returns a catalog of every variant above.
#[must_use]
pub fn catalog() -> Catalog {
    Catalog::from_variants([
        &RESOURCE_GROUP,
        &STORAGE_ACCOUNT,
        &BLOB_CONTAINER,
        &APP_SERVICE_PLAN,
        &WEB_APP,
    ])
}
