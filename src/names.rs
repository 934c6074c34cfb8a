use std::collections::HashMap;

use log::{debug, warn};

use smartstring::alias::{String as SmartString};

use super::context::{CountryRecord, JoinedCountryRecord};


/// English labels as used by the ECharts world map, paired with the Chinese
/// labels used by the foreign feed.
///
/// Hand-maintained and known to be incomplete; countries missing here end up
/// in [`JoinReport::gaps`]. The two Congo entries are crossed over relative to
/// their common Chinese names and are kept that way to match the published
/// maps.
pub static BUILTIN_NAMES: &'static [(&'static str, &'static str)] = &[
	("Liechtenstein", "列支敦士登"),
	("Morocco", "摩洛哥"),
	("W. Sahara", "西撒哈拉"),
	("Serbia", "塞尔维亚"),
	("Afghanistan", "阿富汗"),
	("Angola", "安哥拉"),
	("Albania", "阿尔巴尼亚"),
	("Aland", "奥兰群岛"),
	("Andorra", "安道尔"),
	("United Arab Emirates", "阿联酋"),
	("Argentina", "阿根廷"),
	("Armenia", "亚美尼亚"),
	("American Samoa", "美属萨摩亚"),
	("Fr. S. Antarctic Lands", "法属南半球和南极领地"),
	("Antigua and Barb.", "安提瓜和巴布达"),
	("Australia", "澳大利亚"),
	("Austria", "奥地利"),
	("Azerbaijan", "阿塞拜疆"),
	("Burundi", "布隆迪"),
	("Belgium", "比利时"),
	("Benin", "贝宁"),
	("Burkina Faso", "布基纳法索"),
	("Bangladesh", "孟加拉国"),
	("Bulgaria", "保加利亚"),
	("Bahrain", "巴林"),
	("Bahamas", "巴哈马"),
	("Bosnia and Herz.", "波黑"),
	("Belarus", "白俄罗斯"),
	("Belize", "伯利兹"),
	("Bermuda", "百慕大"),
	("Bolivia", "玻利维亚"),
	("Brazil", "巴西"),
	("Barbados", "巴巴多斯"),
	("Brunei", "文莱"),
	("Bhutan", "不丹"),
	("Botswana", "博茨瓦纳"),
	("Central African Rep.", "中非"),
	("Canada", "加拿大"),
	("Switzerland", "瑞士"),
	("Chile", "智利"),
	("China", "中国"),
	("Côte d'Ivoire", "科特迪瓦"),
	("Cameroon", "喀麦隆"),
	("Dem. Rep. Congo", "刚果（布）"),
	("Congo", "刚果（金）"),
	("Colombia", "哥伦比亚"),
	("Comoros", "科摩罗"),
	("Cape Verde", "佛得角"),
	("Costa Rica", "哥斯达黎加"),
	("Cuba", "古巴"),
	("Curaçao", "库拉索"),
	("Cayman Is.", "开曼群岛"),
	("N. Cyprus", "北塞浦路斯"),
	("Cyprus", "塞浦路斯"),
	("Czech Rep.", "捷克"),
	("Germany", "德国"),
	("Djibouti", "吉布提"),
	("Denmark", "丹麦"),
	("Dominican Rep.", "多米尼加"),
	("Algeria", "阿尔及利亚"),
	("Ecuador", "厄瓜多尔"),
	("Egypt", "埃及"),
	("Eritrea", "厄立特里亚"),
	("Spain", "西班牙"),
	("Estonia", "爱沙尼亚"),
	("Ethiopia", "埃塞俄比亚"),
	("Finland", "芬兰"),
	("Fiji", "斐济"),
	("Falkland Is.", "福克兰群岛（马尔维纳斯）"),
	("France", "法国"),
	("Faeroe Is.", "法罗群岛"),
	("Micronesia", "密克罗尼西亚"),
	("Gabon", "加蓬"),
	("United Kingdom", "英国"),
	("Georgia", "格鲁吉亚"),
	("Ghana", "加纳"),
	("Guinea", "几内亚"),
	("Gambia", "冈比亚"),
	("Guinea-Bissau", "几内亚比绍"),
	("Eq. Guinea", "赤道几内亚"),
	("Greece", "希腊"),
	("Grenada", "格林纳达"),
	("Greenland", "格陵兰"),
	("Guatemala", "危地马拉"),
	("Guam", "关岛"),
	("Heard I. and McDonald Is.", "赫德岛和麦克唐纳群岛"),
	("Honduras", "洪都拉斯"),
	("Croatia", "克罗地亚"),
	("Haiti", "海地"),
	("Hungary", "匈牙利"),
	("Indonesia", "印度尼西亚"),
	("Isle of Man", "英国属地曼岛"),
	("India", "印度"),
	("Br. Indian Ocean Ter.", "英属印度洋领土"),
	("Ireland", "爱尔兰"),
	("Iran", "伊朗"),
	("Iraq", "伊拉克"),
	("Iceland", "冰岛"),
	("Israel", "以色列"),
	("Italy", "意大利"),
	("Jamaica", "牙买加"),
	("Jersey", "泽西岛"),
	("Jordan", "约旦"),
	("Japan", "日本"),
	("Siachen Glacier", "锡亚琴冰川"),
	("Kazakhstan", "哈萨克斯坦"),
	("Kenya", "肯尼亚"),
	("Kyrgyzstan", "吉尔吉斯斯坦"),
	("Cambodia", "柬埔寨"),
	("Kiribati", "基里巴斯"),
	("Korea", "韩国"),
	("Kuwait", "科威特"),
	("Lao PDR", "老挝"),
	("Lebanon", "黎巴嫩"),
	("Liberia", "利比里亚"),
	("Libya", "利比亚"),
	("Saint Lucia", "圣卢西亚"),
	("Sri Lanka", "斯里兰卡"),
	("Lesotho", "莱索托"),
	("Lithuania", "立陶宛"),
	("Luxembourg", "卢森堡"),
	("Latvia", "拉脱维亚"),
	("Moldova", "摩尔多瓦"),
	("Madagascar", "马达加斯加"),
	("Mexico", "墨西哥"),
	("Macedonia", "北马其顿"),
	("Mali", "马里"),
	("Malta", "马耳他"),
	("Myanmar", "缅甸"),
	("Montenegro", "黑山"),
	("Mongolia", "蒙古"),
	("N. Mariana Is.", "北马里亚纳"),
	("Mozambique", "莫桑比克"),
	("Mauritania", "毛利塔尼亚"),
	("Montserrat", "蒙特塞拉特"),
	("Mauritius", "毛里求斯"),
	("Malawi", "马拉维"),
	("Malaysia", "马来西亚"),
	("Namibia", "纳米比亚"),
	("New Caledonia", "新喀里多尼亚"),
	("Niger", "尼日尔"),
	("Nigeria", "尼日利亚"),
	("Nicaragua", "尼加拉瓜"),
	("Niue", "纽埃"),
	("Netherlands", "荷兰"),
	("Norway", "挪威"),
	("Nepal", "尼泊尔"),
	("New Zealand", "新西兰"),
	("Oman", "阿曼"),
	("Pakistan", "巴基斯坦"),
	("Panama", "巴拿马"),
	("Peru", "秘鲁"),
	("Philippines", "菲律宾"),
	("Palau", "帕劳"),
	("Papua New Guinea", "巴布亚新几内亚"),
	("Poland", "波兰"),
	("Puerto Rico", "波多黎各"),
	("Dem. Rep. Korea", "朝鲜"),
	("Portugal", "葡萄牙"),
	("Paraguay", "巴拉圭"),
	("Palestine", "巴勒斯坦"),
	("Fr. Polynesia", "法属波利尼西亚"),
	("Qatar", "卡塔尔"),
	("Romania", "罗马尼亚"),
	("Russia", "俄罗斯"),
	("Rwanda", "卢旺达"),
	("Saudi Arabia", "沙特阿拉伯"),
	("Sudan", "苏丹"),
	("S. Sudan", "南苏丹"),
	("Senegal", "塞内加尔"),
	("Singapore", "新加坡"),
	("S. Geo. and S. Sandw. Is.", "南乔治亚岛和南桑威奇群岛"),
	("Saint Helena", "圣赫勒拿"),
	("Solomon Is.", "所罗门群岛"),
	("Sierra Leone", "塞拉利昂"),
	("El Salvador", "萨尔瓦多"),
	("St. Pierre and Miquelon", "圣皮埃尔和密克隆"),
	("São Tomé and Principe", "圣多美和普林西比"),
	("Suriname", "苏里南"),
	("Slovakia", "斯洛伐克"),
	("Slovenia", "斯洛文尼亚"),
	("Sweden", "瑞典"),
	("Swaziland", "斯威士兰"),
	("Seychelles", "塞舌尔"),
	("Syria", "叙利亚"),
	("Turks and Caicos Is.", "特克斯和凯科斯群岛"),
	("Chad", "乍得"),
	("Togo", "多哥"),
	("Thailand", "泰国"),
	("Tajikistan", "塔吉克斯坦"),
	("Turkmenistan", "土库曼斯坦"),
	("Timor-Leste", "东帝汶"),
	("Tonga", "汤加"),
	("Trinidad and Tobago", "特立尼达和多巴哥"),
	("Tunisia", "突尼斯"),
	("Turkey", "土耳其"),
	("Tanzania", "坦桑尼亚"),
	("Uganda", "乌干达"),
	("Ukraine", "乌克兰"),
	("Uruguay", "乌拉圭"),
	("United States", "美国"),
	("Uzbekistan", "乌兹别克斯坦"),
	("St. Vin. and Gren.", "圣文森特和格林纳丁斯"),
	("Venezuela", "委内瑞拉"),
	("U.S. Virgin Is.", "美属维尔京群岛"),
	("Vietnam", "越南"),
	("Vanuatu", "瓦努阿图"),
	("Samoa", "萨摩亚"),
	("Yemen", "也门"),
	("South Africa", "南非"),
	("Zambia", "赞比亚"),
	("Zimbabwe", "津巴布韦"),
	("Somalia", "索马里"),
	("Anguilla", "安圭拉"),
	("Dominica", "多米尼克"),
	("Gibraltar", "直布罗陀"),
	("Guyana", "圭亚那"),
	("Saint Kitts and Nevis", "圣基茨和尼维斯"),
	("Monaco", "摩纳哥"),
	("Maldives", "马尔代夫"),
	("San Marino", "圣马力诺"),
	("Vatican City", "梵蒂冈"),
	("British Virgin Islands", "英属维尔京群岛"),
];


/// Immutable English/Chinese country-name table.
///
/// Lookups go by Chinese label. If the table lists the same Chinese label more
/// than once, the first entry wins and the later ones are reported by
/// [`NameMapping::duplicates`].
#[derive(Debug, Clone)]
pub struct NameMapping {
	entries: Vec<(SmartString, SmartString)>,
	by_chinese: HashMap<SmartString, usize>,
	duplicates: Vec<usize>,
}

impl NameMapping {
	pub fn from_pairs<I, E, C>(pairs: I) -> Self
		where I: IntoIterator<Item = (E, C)>,
		      E: Into<SmartString>,
		      C: Into<SmartString>,
	{
		let mut entries = Vec::new();
		let mut by_chinese = HashMap::new();
		let mut duplicates = Vec::new();
		for (i, (en, zh)) in pairs.into_iter().enumerate() {
			let en = en.into();
			let zh: SmartString = zh.into();
			if by_chinese.contains_key(&zh) {
				duplicates.push(i);
			} else {
				by_chinese.insert(zh.clone(), i);
			}
			entries.push((en, zh));
		}
		Self{entries, by_chinese, duplicates}
	}

	pub fn builtin() -> Self {
		let result = Self::from_pairs(BUILTIN_NAMES.iter().copied());
		debug!("loaded {} builtin country names", result.len());
		result
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// English label for a Chinese country name.
	pub fn english(&self, chinese: &str) -> Option<&str> {
		let index = *self.by_chinese.get(chinese)?;
		Some(&self.entries[index].0)
	}

	/// Entries shadowed by an earlier entry with the same Chinese label, as
	/// `(english, chinese)` pairs in table order.
	pub fn duplicates(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
		self.duplicates.iter().map(move |i| {
			let (en, zh) = &self.entries[*i];
			(en.as_str(), zh.as_str())
		})
	}
}


#[derive(Debug, Clone, PartialEq)]
pub struct JoinReport {
	pub joined: Vec<JoinedCountryRecord>,
	/// Chinese names which had no mapping entry, in input order.
	pub gaps: Vec<SmartString>,
}

impl JoinReport {
	pub fn log_gaps(&self) {
		if self.gaps.is_empty() {
			return
		}
		warn!(
			"{} countries have no english name and are left out of the world map: {}",
			self.gaps.len(),
			self.gaps.join(", "),
		);
	}
}

/// Inner join of the countries against the name table on the Chinese label.
///
/// Keeps input order. Unmapped countries are dropped from `joined` and listed
/// in `gaps`, so `joined.len() + gaps.len() == countries.len()`.
pub fn join(countries: &[CountryRecord], names: &NameMapping) -> JoinReport {
	let mut joined = Vec::with_capacity(countries.len());
	let mut gaps = Vec::new();
	for country in countries.iter() {
		match names.english(&country.name) {
			Some(en) => joined.push(JoinedCountryRecord{
				english: en.into(),
				record: country.clone(),
			}),
			None => gaps.push(country.name.clone()),
		}
	}
	debug!("joined {} countries, {} without mapping", joined.len(), gaps.len());
	JoinReport{joined, gaps}
}
