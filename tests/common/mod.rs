use std::collections::HashMap;

use rentadoc::{AgreementRecord, AssetError, AssetFetcher, AssetSource};
use serde_json::json;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A representative agreement as the CRUD layer would hand it over,
/// including a legacy alias (`rentAmount`) that must lose to the
/// granular field.
pub fn sample_record() -> AgreementRecord {
    AgreementRecord::new(json!({
        "agreementNumber": "RA-2025-0042",
        "agreementDate": "2025-03-05",
        "language": "english",
        "ownerDetails": {
            "name": "Ramesh Patel",
            "phone": "9876543210",
            "address": "12, Shanti Nagar, Ahmedabad"
        },
        "tenantDetails": {
            "name": "Sita Sharma",
            "phone": "9123456780",
            "permanentAddress": "8, Lake View Road, Pune"
        },
        "propertyDetails": {
            "flatNo": "B-304",
            "street": "MG Road",
            "city": "ahmedabad",
            "state": "Gujarat",
            "pincode": "380009",
            "furnishing": "semi_furnished",
            "purpose": "residential"
        },
        "rentalTerms": {
            "monthlyRent": 15000,
            "rentAmount": 99999,
            "securityDeposit": 45000,
            "maintenanceCharge": "included in rent",
            "startDate": "2025-04-01",
            "endDate": "2026-02-28"
        },
        "additionalClauses": ["No pets allowed.", "Rent payable by the 5th of each month."],
        "ownerDocuments": { "aadharUrl": "/uploads/owner_aadhar.jpg" },
        "tenantDocuments": { "aadharUrl": "/uploads/tenant_aadhar.png" }
    }))
}

/// A compact but structurally realistic agreement template: title,
/// conditional clauses, a terms table, signature markers and embedded
/// document slots.
pub const SAMPLE_TEMPLATE: &str = r#"
<html><head><style>body { font-family: serif; }</style></head><body>
<p style="text-align: center;">RENT AGREEMENT</p>
<p>This agreement no. {{AGREEMENT_NUMBER}} is made on {{AGREEMENT_DATE}} between
<strong>{{OWNER_NAME}}</strong>, residing at {{OWNER_ADDRESS}},</p>
<p>Hereinafter called the LANDLORD</p>
<p>and <strong>{{TENANT_NAME}}</strong>, residing at {{TENANT_ADDRESS}},</p>
<p>Hereinafter called the TENANT</p>
<table>
  <tr><td>Monthly Rent</td><td>Rs. {{RENT_AMOUNT}} ({{RENT_AMOUNT_WORDS}} Rupees)</td></tr>
  <tr><td>Security Deposit</td><td>Rs. {{SECURITY_DEPOSIT}} ({{SECURITY_DEPOSIT_WORDS}} Rupees)</td></tr>
  <tr><td>Term</td><td>{{START_DATE}} to {{END_DATE}} ({{TENURE}})</td></tr>
</table>
<p>1. The premises at {{PROPERTY_FLAT_NO}}, {{PROPERTY_STREET}}, {{PROPERTY_CITY}} shall be
used for {{PROPERTY_PURPOSE}} purposes only.</p>
<p>2. {{MAINTENANCE_INCLUSION}}{{MAINTENANCE_EXCLUSION}}</p>
{{#if PROPERTY_PURPOSE_COMMERCIAL}}<p>3. GST shall be charged as applicable on commercial use.</p>{{/if}}
<p>Additional clauses:</p>
<p>{{ADDITIONAL_CLAUSES}}</p>
{{#if OWNER_AADHAAR_DOCUMENT}}{{OWNER_AADHAAR_DOCUMENT}}{{/if}}
{{#if TENANT_AADHAAR_DOCUMENT}}{{TENANT_AADHAAR_DOCUMENT}}{{/if}}
<div data-region="signature" data-name="{{OWNER_NAME}}" data-role="Landlord"></div>
<div data-region="signature" data-name="{{TENANT_NAME}}" data-role="Tenant"></div>
</body></html>
"#;

/// In-memory fetcher keyed by source path/URL.
pub struct MemoryFetcher {
    assets: HashMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self { assets: HashMap::new() }
    }

    pub fn with(mut self, source: &str, bytes: Vec<u8>) -> Self {
        self.assets.insert(source.to_string(), bytes);
        self
    }
}

impl AssetFetcher for MemoryFetcher {
    fn fetch(&self, source: &AssetSource) -> Result<Vec<u8>, AssetError> {
        let key = match source {
            AssetSource::Cloud(s) | AssetSource::Local(s) => s.clone(),
            AssetSource::Unsupported(s) => return Err(AssetError::Unsupported(s.clone())),
        };
        self.assets
            .get(&key)
            .cloned()
            .ok_or(AssetError::NotFound(key))
    }
}

pub const JPEG_MAGIC: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];

/// Smallest well-formed PNG (1x1, RGBA).
pub const TINY_PNG: [u8; 67] = [
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];
