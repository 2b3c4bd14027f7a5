//! Employee records.

use serde::{Deserialize, Serialize};

/// An employee who needs a pickup.
///
/// The optimizers only use an employee's position in the list: the employee
/// at list position `i` is node `i + 1` of the distance matrix. The address is
/// carried for the geocoding and reporting collaborators.
///
/// # Examples
///
/// ```
/// use u_shuttle::models::Employee;
///
/// let e = Employee::new("Ada Lovelace", "12 Market St");
/// assert_eq!(e.name(), "Ada Lovelace");
/// assert_eq!(e.address(), "12 Market St");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    name: String,
    address: String,
}

impl Employee {
    /// Creates an employee record.
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }

    /// Full name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Approximate pickup address.
    pub fn address(&self) -> &str {
        &self.address
    }
}

/// Matrix node indices (`1..=n`) for an employee list of length `n`.
pub fn employee_nodes(employees: &[Employee]) -> Vec<usize> {
    (1..=employees.len()).collect()
}
