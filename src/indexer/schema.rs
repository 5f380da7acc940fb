use crate::error::Result;
use tantivy::schema::{Field, Schema, STORED, STRING, TEXT};

/// Schema of a term's course index
#[derive(Clone)]
pub struct CourseSchema {
    pub schema: Schema,
    pub code: Field,
    pub code_with_space: Field,
    pub name: Field,
    pub description: Field,
    pub instructors: Field,
    pub code_exact: Field,
    pub code_with_space_exact: Field,
    pub json_data: Field,
}

impl CourseSchema {
    pub fn new() -> Self {
        let mut schema_builder = Schema::builder();

        // Searchable text fields
        let code = schema_builder.add_text_field("code", TEXT);
        let code_with_space = schema_builder.add_text_field("code_with_space", TEXT);
        let name = schema_builder.add_text_field("name", TEXT);
        let description = schema_builder.add_text_field("description", TEXT);
        let instructors = schema_builder.add_text_field("instructors", TEXT);

        // Untokenized codes for exact phrase matches
        let code_exact = schema_builder.add_text_field("code_exact", STRING);
        let code_with_space_exact = schema_builder.add_text_field("code_with_space_exact", STRING);

        // Full course snapshot (stored, not searchable)
        let json_data = schema_builder.add_text_field("json_data", STORED);

        let schema = schema_builder.build();

        Self {
            schema,
            code,
            code_with_space,
            name,
            description,
            instructors,
            code_exact,
            code_with_space_exact,
            json_data,
        }
    }

    /// Resolve fields from the schema of an index opened from disk
    pub fn from_schema(schema: Schema) -> Result<Self> {
        Ok(Self {
            code: schema.get_field("code")?,
            code_with_space: schema.get_field("code_with_space")?,
            name: schema.get_field("name")?,
            description: schema.get_field("description")?,
            instructors: schema.get_field("instructors")?,
            code_exact: schema.get_field("code_exact")?,
            code_with_space_exact: schema.get_field("code_with_space_exact")?,
            json_data: schema.get_field("json_data")?,
            schema,
        })
    }

    /// Fields a search phrase is matched against
    pub fn text_fields(&self) -> [Field; 5] {
        [
            self.code,
            self.code_with_space,
            self.name,
            self.description,
            self.instructors,
        ]
    }
}

impl Default for CourseSchema {
    fn default() -> Self {
        Self::new()
    }
}
