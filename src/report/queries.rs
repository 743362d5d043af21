//! The ten civic-records queries run by default.

use super::ReportQuery;

/// Returns the built-in queries, `A` through `J`, in report order.
pub fn civic_queries() -> Vec<ReportQuery> {
    vec![
        ReportQuery::new(
            "A",
            "Names of all citizens who hold more than 1 acre of land:",
            "SELECT a.name FROM citizens a \
             JOIN land_records r ON a.citizen_id = r.citizen_id \
             GROUP BY a.name HAVING SUM(r.area_acres) > 1;",
        ),
        ReportQuery::new(
            "B",
            "Girls who study in school with household income less than 1 Lakh per year:",
            "SELECT b.name FROM citizens b \
             JOIN households h ON b.household_id = h.household_id \
             WHERE b.gender = 'Female' AND h.income < 100000 AND b.education_status = 'Yes' \
             AND DATE_PART('year', AGE(b.dob)) BETWEEN 5 AND 18;",
        ),
        ReportQuery::new(
            "C",
            "Acres of land that cultivate rice:",
            "SELECT SUM(area_acres) AS total_land_area_inacres FROM land_records l \
             WHERE l.crop_type = 'rice';",
        ),
        ReportQuery::new(
            "D",
            "Number of citizens born after 1.1.2000 with educational qualification of 10th class:",
            "SELECT COUNT(citizen_id) AS total_citizens FROM citizens \
             WHERE dob > '2000-01-01' AND educational_qualification = '10th';",
        ),
        ReportQuery::new(
            "E",
            "Names of all panchayat employees who also hold more than 1 acre of land:",
            "SELECT e.name FROM panchayat_employees p \
             JOIN citizens e ON p.citizen_id = e.citizen_id \
             JOIN land_records l ON l.citizen_id = e.citizen_id \
             GROUP BY e.name HAVING SUM(l.area_acres) > 1;",
        ),
        ReportQuery::new(
            "F",
            "Names of the household members of the Panchayat Pradhan:",
            "SELECT c2.name FROM citizens c1 \
             JOIN panchayat_employees pe ON c1.citizen_id = pe.citizen_id \
             JOIN citizens c2 ON c1.household_id = c2.household_id \
             WHERE pe.role = 'Panchayat Pradhan';",
        ),
        ReportQuery::new(
            "G",
            "Street light assets installed in Phulera in 2024:",
            "SELECT COUNT(*) AS total_street_lights FROM assets \
             WHERE type = 'Street Light' AND location = 'Phulera' \
             AND EXTRACT(YEAR FROM installation_date) = 2024;",
        ),
        ReportQuery::new(
            "H",
            "Vaccinations done in 2024 for the children of citizens whose educational qualification is class 10:",
            "SELECT COUNT(v.vaccination_id) AS num_vaccinations FROM citizens c \
             JOIN citizens children ON c.citizen_id = children.father_id OR c.citizen_id = children.mother_id \
             JOIN vaccinations v ON children.citizen_id = v.citizen_id \
             WHERE c.educational_qualification = '10th' \
             AND EXTRACT(YEAR FROM v.date_administered) = 2024 \
             AND DATE_PART('year', AGE(children.dob)) <= 18;",
        ),
        ReportQuery::new(
            "I",
            "Births of boy children in the year 2024:",
            "SELECT COUNT(*) AS total_births FROM census_data cd \
             JOIN citizens c ON cd.citizen_id = c.citizen_id \
             WHERE cd.event_type = 'Birth' AND EXTRACT(YEAR FROM cd.event_date) = 2024 \
             AND c.gender = 'Male';",
        ),
        ReportQuery::new(
            "J",
            "Citizens who belong to the household of at least one panchayat employee:",
            "SELECT COUNT(DISTINCT c.citizen_id) AS total_citizens FROM citizens c \
             WHERE c.household_id IN (\
             SELECT DISTINCT h.household_id FROM households h \
             JOIN panchayat_employees pe \
             ON h.household_id = (SELECT household_id FROM citizens WHERE citizen_id = pe.citizen_id));",
        ),
    ]
}
