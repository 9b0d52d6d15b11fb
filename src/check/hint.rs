//! Remediation text shown after a failed check.
//!
//! Each hint is a static template plus named fields filled in from whatever
//! the failing probe returned. Placeholders are written `{name}`.

pub const CONNECTION: &str = "\
Hints:
* Is the database server started?
* Check the NOMINATIM_DATABASE_DSN variable in your local .env
* Try connecting to the database with the same settings";

pub const MODULE: &str = "\
The Postgresql extension nominatim.so was not found in the database.
Hints:
* Check the output of the CMmake/make installation step
* Does nominatim.so exist?
* Does nominatim.so exist on the database server?
* Can nominatim.so be accessed by the database user?";

pub const PLACE_TABLE: &str = "\
* The import didn't finish.
Hints:
* Check the output of the utils/setup.php you ran.
Usually the osm2pgsql step failed. Check for errors related to
* the file you imported not containing any places
* harddrive full
* out of memory (RAM)
* osm2pgsql killed by other scripts, for consuming to much memory";

pub const INDEXING: &str = "\
The indexing didn't finish. There is still {count} places. See the
question 'Can a stopped/killed import process be resumed?' in the
troubleshooting guide.";

pub const MISSING_INDEX: &str = "\
Hints:
* Run './utils/setup.php --create-search-indices --ignore-errors' to
  create missing indices.";

pub const INVALID_INDICES: &str = "\
At least one index is invalid. That can happen, e.g. when index creation was
disrupted and later restarted. You should delete the affected indices and
run the index stage of setup again.
See the question 'Can a stopped/killed import process be resumed?' in the
troubleshooting guide.
Affected indices: {indices}";

pub const TIGER_TABLE: &str = "\
Table 'location_property_tiger' does not exist. Run the TIGER data
import again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    template: &'static str,
    fields: Vec<(&'static str, String)>,
}

impl Hint {
    pub fn new(template: &'static str) -> Self {
        Self {
            template,
            fields: Vec::new(),
        }
    }

    pub fn with(mut self, name: &'static str, value: impl ToString) -> Self {
        self.fields.push((name, value.to_string()));
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Template with every known placeholder substituted.
    pub fn render(&self) -> String {
        let mut out = self.template.to_string();
        for (name, value) in &self.fields {
            out = out.replace(&format!("{{{name}}}"), value);
        }
        out
    }
}
