use clawdoc_core::{FieldDescriptor, FieldsSnippet, JsonFieldType, SubsectionExtractor};

const ORDER: &[u8] = br#"{
  "id": 42,
  "customer": {"name": "Ann", "email": null},
  "lines": [
    {"sku": "A-1", "quantity": 2, "gift": true},
    {"sku": "B-2", "quantity": 1}
  ]
}"#;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().pretty().init();

    // Whole payload
    let order = FieldsSnippet::new([
        FieldDescriptor::new("id").described_as("The order id"),
        FieldDescriptor::new("customer").described_as("Who placed the order"),
        FieldDescriptor::new("customer.name"),
        FieldDescriptor::new("customer.email")
            .optional()
            .of_type(JsonFieldType::String),
        FieldDescriptor::subsection_with_path("lines").described_as("The ordered lines"),
    ]);
    let table = order.document(ORDER, None)?;
    println!("{}", serde_json::to_string_pretty(&table)?);

    // Each line, documented once
    let lines = FieldsSnippet::new([
        FieldDescriptor::new("sku"),
        FieldDescriptor::new("quantity"),
        FieldDescriptor::new("gift").optional().of_type(JsonFieldType::Boolean),
    ])
    .beneath(SubsectionExtractor::beneath_path("lines"));
    let table = lines.document(ORDER, None)?;
    println!("{}", serde_json::to_string_pretty(&table)?);

    Ok(())
}
