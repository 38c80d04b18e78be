//! Small files shaped like the upstream ones: two dates, a few locations.

pub const GLOBAL_CONFIRMED: &str = "\
Province/State,Country/Region,Lat,Long,1/22/20,1/23/20
Australian Capital Territory,Australia,-35.4735,149.0124,0,4
New South Wales,Australia,-33.8688,151.2093,0,4
Alberta,Canada,53.9333,-116.5765,0,4
British Columbia,Canada,49.2827,-123.1207,0,5
Diamond Princess,Canada,0,0,0,1
Recovered,Canada,0,0,0,0
Anhui,China,31.8257,117.2264,0,4
Beijing,China,40.1824,116.4142,0,4
,Turkey,38.9637,35.2433,0,4
";

pub const GLOBAL_DEATHS: &str = "\
Province/State,Country/Region,Lat,Long,1/22/20,1/23/20
Australian Capital Territory,Australia,-35.4735,149.0124,0,1
New South Wales,Australia,-33.8688,151.2093,0,1
Alberta,Canada,53.9333,-116.5765,0,1
British Columbia,Canada,49.2827,-123.1207,0,1
Diamond Princess,Canada,0,0,0,1
Recovered,Canada,0,0,0,0
Anhui,China,31.8257,117.2264,0,1
Beijing,China,40.1824,116.4142,0,1
,Turkey,38.9637,35.2433,0,1
";

pub const GLOBAL_RECOVERED: &str = "\
Province/State,Country/Region,Lat,Long,1/22/20,1/23/20
Australian Capital Territory,Australia,-35.4735,149.0124,0,2
New South Wales,Australia,-33.8688,151.2093,0,2
,Canada,56.1304,-106.3468,0,3
Anhui,China,31.8257,117.2264,0,2
Beijing,China,40.1824,116.4142,0,2
";

pub const REGION_CONFIRMED: &str = "\
UID,iso2,iso3,code3,FIPS,Admin2,Province_State,Country_Region,Lat,Long_,Combined_Key,Population,1/22/20,1/23/20
16,AS,ASM,16,60.0,,American Samoa,US,-14.271,-170.132,\"American Samoa, US\",55641,0,4
84001001,US,USA,840,1001.0,Autauga,Alabama,US,32.53952745,-86.64408227,\"Autauga, Alabama, US\",55869,0,4
84001003,US,USA,840,1003.0,Baldwin,Alabama,US,30.72774991,-87.72207058,\"Baldwin, Alabama, US\",223234,0,4
84070017,US,USA,840,,Southeast Utah,Utah,US,38.99617072,-110.7013958,\"Southeast Utah, Utah, US\",0,0,4
84070018,US,USA,840,,Southwest Utah,Utah,US,37.85447192,-111.4418764,\"Southwest Utah, Utah, US\",0,0,4
";

pub const REGION_DEATHS: &str = "\
UID,iso2,iso3,code3,FIPS,Admin2,Province_State,Country_Region,Lat,Long_,Combined_Key,Population,1/22/20,1/23/20
16,AS,ASM,16,60.0,,American Samoa,US,-14.271,-170.132,\"American Samoa, US\",55641,0,1
84001001,US,USA,840,1001.0,Autauga,Alabama,US,32.53952745,-86.64408227,\"Autauga, Alabama, US\",55869,0,1
84001003,US,USA,840,1003.0,Baldwin,Alabama,US,30.72774991,-87.72207058,\"Baldwin, Alabama, US\",223234,0,1
84070017,US,USA,840,,Southeast Utah,Utah,US,38.99617072,-110.7013958,\"Southeast Utah, Utah, US\",0,0,1
84070018,US,USA,840,,Southwest Utah,Utah,US,37.85447192,-111.4418764,\"Southwest Utah, Utah, US\",0,0,1
";
