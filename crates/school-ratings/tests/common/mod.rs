#![allow(dead_code)]

use school_ratings::datasets::DatasetBundle;
use school_ratings::InMemoryDirectory;

const SCHOOLS: &str = "\
urn,name,country,is_scotland,phase,school_type,type_group,local_authority,town,postcode
100001,Hill Top Primary,England,,Primary,Community school,Local authority maintained schools,Leeds,Leeds,LS1 1AA
200002,Loch View Academy,Scotland,true,Secondary,Academy,Scottish schools,City of Edinburgh,Edinburgh,EH1 1AA
100003,Brook Lane Infant,England,,Primary,Community school,Local authority maintained schools,Leeds,Leeds,LS2 2BB
100004,Millfield High,England,,Secondary,Foundation school,Local authority maintained schools,Leeds,Leeds,LS3 3CC
100005,Ashgrove Primary,England,,Primary,Voluntary aided school,Local authority maintained schools,Leeds,Leeds,LS4 4DD
";

const OFSTED: &str = "\
urn,overall_effectiveness,inspection_date
100001,Good,2016-05-10
100001,1,2022-03-01
100004,2,2021-11-19
";

const ATTENDANCE: &str = "\
urn,academic_year,overall_absence_rate,la_absence_rate,national_absence_rate
100001,2022/23,5.0,6.1,5.9
100005,2022/23,4.0,6.1,5.9
";

const ATTAINMENT: &str = "\
urn,academic_year,english_pct,english_la_pct,english_national_pct,maths_pct,maths_la_pct,maths_national_pct,science_pct,science_la_pct,science_national_pct
100001,2021/22,50,,,50,,,50,,
100001,2022/23,72,70,73,72,70,73,72,,80
200002,2022/23,60,,65,60,,64,90,,
100005,2022/23,80,,,90,,,70,,
";

const CENSUS: &str = "\
urn,academic_year,number_on_roll,fsm_pct,eal_pct,sen_pct
100001,2022/23,412,12.5,8.0,11.0
100005,2022/23,390,n/a,,
";

/// Five schools: four in Leeds and one in Edinburgh.
///
/// * 100001 has every metric (worked example A).
/// * 200002 is Scottish with academic data only (worked example B).
/// * 100003 has no metrics at all.
/// * 100004 only has an inspection.
/// * 100005 has academic and attendance data but no inspection.
pub fn bundle() -> DatasetBundle {
    DatasetBundle {
        registry: DatasetBundle::rows_from_reader(SCHOOLS.as_bytes()).expect("registry parses"),
        ofsted: DatasetBundle::rows_from_reader(OFSTED.as_bytes()).expect("ofsted parses"),
        census: DatasetBundle::rows_from_reader(CENSUS.as_bytes()).expect("census parses"),
        attendance: DatasetBundle::rows_from_reader(ATTENDANCE.as_bytes())
            .expect("attendance parses"),
        attainment: DatasetBundle::rows_from_reader(ATTAINMENT.as_bytes())
            .expect("attainment parses"),
    }
}

pub fn directory() -> InMemoryDirectory {
    InMemoryDirectory::new(bundle())
}
