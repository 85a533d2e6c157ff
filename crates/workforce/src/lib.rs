//! Workforce module: staff members and the salaries paid to them.

pub mod salary;
pub mod staff;

pub use backoffice_core::PayerTotal;
pub use salary::{NewSalary, Salary, SalaryPatch, SalaryStatus, totals_by_payer};
pub use staff::{Gender, NewStaff, Staff, StaffPatch};
